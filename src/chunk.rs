use num::PrimInt;
use num::Unsigned;
use std::fmt::Debug;

use crate::utils::{low_mask, popcount32, popcount64};

/// Trait representing an unsigned integer type used as a bitmap chunk,
/// which allows the sparse array to be generic over chunk sizes.
///
/// Only the low `WIDTH` bits of a chunk carry index bits. The top bit is left
/// unused so that every chunk value is also a valid non-negative value of the
/// signed type of the same size.
pub trait Chunk: PrimInt + Unsigned + Debug + Default {
    /// Number of usable index bits per chunk
    const WIDTH: u32;

    /// Chunk index and bit offset of the `i`-th index
    fn index_offset(i: usize) -> (usize, u32) {
        let width = Self::WIDTH as usize;
        let chunk_index = i / width;
        (chunk_index, (i - chunk_index * width) as u32)
    }

    /// A chunk with only bit `offset` set
    fn bit(offset: u32) -> Self {
        debug_assert!(offset < Self::WIDTH);
        Self::one() << offset as usize
    }

    /// A chunk with the low `n` bits set
    fn one_mask(n: u32) -> Self;

    /// Number of 1-bits in this chunk
    fn popcount(self) -> u32;

    /// Bit offset of the highest 1-bit, if any
    fn highest_one(self) -> Option<u32> {
        if self.is_zero() {
            None
        } else {
            Some(Self::zero().count_zeros() - 1 - self.leading_zeros())
        }
    }
}

// Chunks no wider than 32 bits are counted in the 32-bit domain.
macro_rules! impl_narrow_chunk {
    ($t:ty) => {
        impl Chunk for $t {
            const WIDTH: u32 = <$t>::BITS - 1;

            fn one_mask(n: u32) -> Self {
                low_mask(n) as $t
            }

            fn popcount(self) -> u32 {
                popcount32(u32::from(self))
            }
        }
    };
}

impl_narrow_chunk!(u8);
impl_narrow_chunk!(u16);
impl_narrow_chunk!(u32);

impl Chunk for u64 {
    const WIDTH: u32 = u64::BITS - 1;

    fn one_mask(n: u32) -> Self {
        low_mask(n)
    }

    fn popcount(self) -> u32 {
        popcount64(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(u8::WIDTH, 7);
        assert_eq!(u16::WIDTH, 15);
        assert_eq!(u32::WIDTH, 31);
        assert_eq!(u64::WIDTH, 63);
    }

    #[test]
    fn test_index_offset() {
        assert_eq!(u8::index_offset(0), (0, 0));
        assert_eq!(u8::index_offset(6), (0, 6));
        assert_eq!(u8::index_offset(7), (1, 0));
        assert_eq!(u8::index_offset(9), (1, 2));
        assert_eq!(u64::index_offset(63), (1, 0));
        assert_eq!(u64::index_offset(130), (2, 4));
    }

    #[test]
    fn test_masks_stay_below_sign_bit() {
        assert_eq!(u8::one_mask(u8::WIDTH), 0x7F);
        assert_eq!(u16::one_mask(u16::WIDTH), 0x7FFF);
        assert_eq!(u32::one_mask(u32::WIDTH) as i32, i32::MAX);
        assert_eq!(u64::one_mask(u64::WIDTH) as i64, i64::MAX);
        assert_eq!(u8::one_mask(0), 0);
        assert_eq!(u8::bit(6), 0x40);
    }

    #[test]
    fn test_popcount_and_highest_one() {
        assert_eq!(0u8.popcount(), 0);
        assert_eq!(0x7Fu8.popcount(), 7);
        assert_eq!(0x5555u16.popcount(), 8);
        assert_eq!(u32::MAX.popcount(), 32);
        assert_eq!(u64::MAX.popcount(), 64);

        assert_eq!(0u8.highest_one(), None);
        assert_eq!(1u8.highest_one(), Some(0));
        assert_eq!(0x41u8.highest_one(), Some(6));
        assert_eq!((1u64 << 62).highest_one(), Some(62));
    }
}
