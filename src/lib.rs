//! A sparse array: a map from non-negative indices to values that stores a
//! bitmap of the populated indices and a dense vector of just those values,
//! locating a value by counting the 1-bits that precede its index.

pub mod bitmap;
pub mod chunk;
pub mod error;
pub mod sparse_array;
pub mod store;
mod utils;

pub use chunk::Chunk;
pub use error::{Result, SparseArrayError};
pub use sparse_array::{checked_index, SparseArray};
