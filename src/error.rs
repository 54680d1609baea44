use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SparseArrayError {
    #[error("negative index {index}")]
    NegativeIndex { index: i64 },

    #[error("index {index} is too large: the array length would overflow")]
    IndexOverflow { index: u64 },

    #[error("cannot allocate bitmap chunks to cover index {index}")]
    CapacityOverflow { index: u64 },

    #[error("invalid operation '{op}'")]
    InvalidOp { op: String },
}

pub type Result<T> = std::result::Result<T, SparseArrayError>;
