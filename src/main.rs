use std::error::Error;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use log::info;

use sparse_array::{checked_index, Chunk, SparseArray, SparseArrayError};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChunkType {
    U8,
    U16,
    U32,
    U64,
}

/// Run a sequence of operations against a sparse array of strings.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Integer type used for bitmap chunks
    #[arg(long, value_enum, default_value_t = ChunkType::U8)]
    chunk: ChunkType,

    /// Operations to run in order: set:I=V, unset:I, get:I, push:V, len, count, dump
    #[arg(required = true)]
    ops: Vec<Op>,
}

#[derive(Debug, Clone)]
enum Op {
    Set(usize, String),
    Unset(usize),
    Get(usize),
    Push(String),
    Len,
    Count,
    Dump,
}

impl FromStr for Op {
    type Err = SparseArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SparseArrayError::InvalidOp { op: s.to_string() };
        let index = |arg: &str| -> Result<usize, SparseArrayError> {
            let index: i64 = arg.parse().map_err(|_| invalid())?;
            checked_index(index)
        };
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        match (name, arg) {
            ("set", Some(arg)) => {
                let (i, value) = arg.split_once('=').ok_or_else(invalid)?;
                Ok(Op::Set(index(i)?, value.to_string()))
            }
            ("unset", Some(i)) => Ok(Op::Unset(index(i)?)),
            ("get", Some(i)) => Ok(Op::Get(index(i)?)),
            ("push", Some(value)) => Ok(Op::Push(value.to_string())),
            ("len", None) => Ok(Op::Len),
            ("count", None) => Ok(Op::Count),
            ("dump", None) => Ok(Op::Dump),
            _ => Err(invalid()),
        }
    }
}

fn run<C: Chunk>(ops: &[Op]) -> Result<(), SparseArrayError> {
    let mut arr = SparseArray::<String, C>::new();
    for op in ops {
        match op {
            Op::Set(index, value) => {
                arr.set(*index, value.clone())?;
            }
            Op::Unset(index) => {
                arr.unset(*index);
            }
            Op::Get(index) => {
                println!("{}", arr.get(*index).map_or("<absent>", String::as_str));
            }
            Op::Push(value) => {
                println!("{}", arr.push(value.clone())?);
            }
            Op::Len => println!("{}", arr.len()),
            Op::Count => println!("{}", arr.count()),
            Op::Dump => arr.for_each(|value, index, _| {
                println!("{}: {}", index, value.map_or("<absent>", String::as_str))
            }),
        }
    }
    info!(
        "finished {} operations: {} entries, length {}, {} chunks of {} bits",
        ops.len(),
        arr.count(),
        arr.len(),
        arr.num_chunks(),
        C::WIDTH
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    match args.chunk {
        ChunkType::U8 => run::<u8>(&args.ops)?,
        ChunkType::U16 => run::<u16>(&args.ops)?,
        ChunkType::U32 => run::<u32>(&args.ops)?,
        ChunkType::U64 => run::<u64>(&args.ops)?,
    }
    Ok(())
}
