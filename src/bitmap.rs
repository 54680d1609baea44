// Growable bitmap recording which indices of a sparse array hold a value.
// Chunk k covers the indices [k * W, k * W + W) where W = C::WIDTH.
// Chunks are appended on demand and never removed, so the bitmap only
// ever grows with the highest index touched.

use log::debug;

use crate::chunk::Chunk;
use crate::error::{Result, SparseArrayError};

/// Whether a lookup may grow the bitmap to cover the probed index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Append zeroed chunks until the index is covered
    Grow,
    /// Never allocate; indices past the end are reported absent
    ReadOnly,
}

#[derive(Debug, Clone, Default)]
pub struct Bitmap<C: Chunk = u8> {
    chunks: Vec<C>,
}

impl<C: Chunk> Bitmap<C> {
    pub fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Returns the rank of `index` among all 1-bits (zero-based), ie. the position
    /// of its value in the dense store, or `None` if the bit is not set.
    /// Fails only when growing and the chunks for `index` cannot be allocated,
    /// in which case the bitmap is left untouched.
    pub fn resolve(&mut self, index: usize, probe: Probe) -> Result<Option<usize>> {
        let (chunk_index, _) = C::index_offset(index);
        if probe == Probe::Grow {
            self.cover(chunk_index, index)?;
        }
        Ok(self.rank(index))
    }

    /// Read-only version of `resolve`.
    pub fn rank(&self, index: usize) -> Option<usize> {
        let (chunk_index, bit_offset) = C::index_offset(index);
        let chunk = *self.chunks.get(chunk_index)?;
        if (chunk & C::bit(bit_offset)).is_zero() {
            return None;
        }
        // Ones in every chunk before this one, plus the ones in this chunk at or
        // below the bit offset. The queried bit itself is counted, hence the -1.
        let preceding = self.count_ones_before(chunk_index);
        let within = (chunk & C::one_mask(bit_offset + 1)).popcount() as usize;
        Some(preceding + within - 1)
    }

    pub fn contains(&self, index: usize) -> bool {
        let (chunk_index, bit_offset) = C::index_offset(index);
        match self.chunks.get(chunk_index) {
            Some(&chunk) => !(chunk & C::bit(bit_offset)).is_zero(),
            None => false,
        }
    }

    /// Set the bit for `index`, growing as needed. Returns false if it was already set.
    pub fn insert(&mut self, index: usize) -> Result<bool> {
        let (chunk_index, bit_offset) = C::index_offset(index);
        self.cover(chunk_index, index)?;
        let bit = C::bit(bit_offset);
        let chunk = &mut self.chunks[chunk_index];
        let was_set = !(*chunk & bit).is_zero();
        *chunk = *chunk | bit;
        Ok(!was_set)
    }

    /// Clear the bit for `index`. Returns false if it was not set.
    /// The chunk stays allocated even if it becomes all zeros.
    pub fn remove(&mut self, index: usize) -> bool {
        let (chunk_index, bit_offset) = C::index_offset(index);
        let Some(chunk) = self.chunks.get_mut(chunk_index) else {
            return false;
        };
        let bit = C::bit(bit_offset);
        let was_set = !(*chunk & bit).is_zero();
        *chunk = *chunk & !bit;
        was_set
    }

    /// Total number of 1-bits
    pub fn count_ones(&self) -> usize {
        self.count_ones_before(self.chunks.len())
    }

    /// Highest index whose bit is set
    pub fn last_one(&self) -> Option<usize> {
        self.chunks
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, &chunk)| {
                chunk
                    .highest_one()
                    .map(|offset| i * C::WIDTH as usize + offset as usize)
            })
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    fn count_ones_before(&self, chunk_index: usize) -> usize {
        self.chunks[..chunk_index]
            .iter()
            .map(|&chunk| chunk.popcount() as usize)
            .sum()
    }

    // Grow to cover `chunk_index`, reserving up front so that a failed
    // allocation is reported instead of aborting.
    fn cover(&mut self, chunk_index: usize, index: usize) -> Result<()> {
        if self.chunks.len() <= chunk_index {
            let additional = chunk_index + 1 - self.chunks.len();
            self.chunks
                .try_reserve(additional)
                .map_err(|_| SparseArrayError::CapacityOverflow {
                    index: index as u64,
                })?;
            debug!(
                "growing bitmap from {} to {} chunks",
                self.chunks.len(),
                chunk_index + 1
            );
            self.chunks.resize(chunk_index + 1, C::zero());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let mut b = Bitmap::<u8>::new();
        assert_eq!(b.rank(0), None);
        assert_eq!(b.resolve(100, Probe::ReadOnly), Ok(None));
        assert_eq!(b.num_chunks(), 0);
        assert_eq!(b.count_ones(), 0);
        assert_eq!(b.last_one(), None);
        assert!(!b.contains(3));
        assert!(!b.remove(3));
    }

    #[test]
    fn test_resolve_grow_allocates_without_setting() {
        let mut b = Bitmap::<u8>::new();
        assert_eq!(b.resolve(20, Probe::Grow), Ok(None));
        // index 20 lives in chunk 2 (20 / 7), so three chunks are allocated.
        assert_eq!(b.num_chunks(), 3);
        assert_eq!(b.count_ones(), 0);
    }

    #[test]
    fn test_ranks() {
        let mut b = Bitmap::<u8>::new();
        for i in [1, 6, 7, 9, 20] {
            assert_eq!(b.insert(i), Ok(true));
        }
        assert_eq!(b.insert(9), Ok(false));
        assert_eq!(b.count_ones(), 5);

        assert_eq!(b.rank(0), None);
        assert_eq!(b.rank(1), Some(0));
        assert_eq!(b.rank(6), Some(1));
        assert_eq!(b.rank(7), Some(2));
        assert_eq!(b.rank(8), None);
        assert_eq!(b.rank(9), Some(3));
        assert_eq!(b.rank(20), Some(4));
        assert_eq!(b.rank(21), None);

        assert_eq!(b.last_one(), Some(20));
    }

    #[test]
    fn test_remove_keeps_chunks() {
        let mut b = Bitmap::<u8>::new();
        b.insert(30).unwrap();
        let chunks = b.num_chunks();
        assert!(b.remove(30));
        assert!(!b.remove(30));
        assert_eq!(b.num_chunks(), chunks);
        assert_eq!(b.count_ones(), 0);
        assert_eq!(b.last_one(), None);
    }

    #[test]
    fn test_wide_chunks() {
        let mut b = Bitmap::<u64>::new();
        b.insert(62).unwrap();
        b.insert(63).unwrap();
        b.insert(200).unwrap();
        assert_eq!(b.num_chunks(), 4);
        assert_eq!(b.rank(62), Some(0));
        assert_eq!(b.rank(63), Some(1));
        assert_eq!(b.rank(200), Some(2));
        assert_eq!(b.last_one(), Some(200));
    }

    #[test]
    fn test_full_chunk() {
        let mut b = Bitmap::<u8>::new();
        for i in 0..14 {
            b.insert(i).unwrap();
        }
        for i in 0..14 {
            assert_eq!(b.rank(i), Some(i));
        }
        assert_eq!(b.num_chunks(), 2);
    }

    #[test]
    fn test_growth_failure_leaves_bitmap_untouched() {
        let mut b = Bitmap::<u8>::new();
        b.insert(3).unwrap();
        let huge = usize::MAX - 1;
        assert_eq!(
            b.resolve(huge, Probe::Grow),
            Err(SparseArrayError::CapacityOverflow { index: huge as u64 })
        );
        assert_eq!(
            b.insert(huge),
            Err(SparseArrayError::CapacityOverflow { index: huge as u64 })
        );
        assert_eq!(b.resolve(huge, Probe::ReadOnly), Ok(None));
        assert_eq!(b.num_chunks(), 1);
        assert_eq!(b.count_ones(), 1);
    }
}
