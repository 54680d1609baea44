// A sparse array maps non-negative indices to values while only paying for the
// indices that are actually populated. A bitmap marks which indices are present
// and a dense store holds the present values in index order, so the position of
// an index's value is the number of 1-bits up to and including its bit.

use std::cell::Cell;

use log::trace;

use crate::bitmap::{Bitmap, Probe};
use crate::chunk::Chunk;
use crate::error::{Result, SparseArrayError};
use crate::store::DenseStore;

#[derive(Debug, Clone)]
pub struct SparseArray<T, C: Chunk = u8> {
    // One bit per index up to the highest index ever touched
    bitmap: Bitmap<C>,
    // Present values, addressed by the rank of their bit
    store: DenseStore<T>,
    // One past the highest present index; None after a mutation until recomputed
    len: Cell<Option<usize>>,
}

impl<T, C: Chunk> Default for SparseArray<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Chunk> SparseArray<T, C> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty array with room for `entries` values before the dense
    /// store reallocates.
    pub fn with_capacity(entries: usize) -> Self {
        Self {
            bitmap: Bitmap::new(),
            store: DenseStore::with_capacity(entries),
            len: Cell::new(Some(0)),
        }
    }

    /// Store `value` at `index`, returning the value previously stored there.
    ///
    /// New entries are appended to the dense store without re-sorting it; the
    /// sort is deferred until a read needs to address the store by rank.
    pub fn set(&mut self, index: usize, value: T) -> Result<Option<T>> {
        if index == usize::MAX {
            return Err(SparseArrayError::IndexOverflow {
                index: index as u64,
            });
        }
        let previous = match self.bitmap.resolve(index, Probe::Grow)? {
            Some(pos) => {
                trace!("overwriting index {} at position {}", index, pos);
                self.store.settle();
                Some(self.store.replace(pos, value))
            }
            None => {
                trace!("inserting index {}", index);
                self.bitmap.insert(index)?;
                self.store.append(index, value);
                None
            }
        };
        self.invalidate();
        Ok(previous)
    }

    /// Like `set`, but `None` clears the index instead of storing a value.
    pub fn assign(&mut self, index: usize, value: Option<T>) -> Result<Option<T>> {
        match value {
            Some(value) => self.set(index, value),
            None => Ok(self.unset(index)),
        }
    }

    /// Remove and return the value at `index`, if any.
    /// The bitmap keeps its size, so memory does not shrink.
    pub fn unset(&mut self, index: usize) -> Option<T> {
        // a read-only probe never allocates, so it cannot fail
        let Ok(Some(pos)) = self.bitmap.resolve(index, Probe::ReadOnly) else {
            return None;
        };
        trace!("removing index {} at position {}", index, pos);
        self.store.settle();
        let (removed, value) = self.store.remove(pos);
        debug_assert_eq!(removed, index);
        self.bitmap.remove(index);
        self.invalidate();
        Some(value)
    }

    /// Return the value at `index`. Takes `&mut self` because a pending
    /// sort of the dense store is carried out first.
    pub fn get(&mut self, index: usize) -> Option<&T> {
        self.store.settle();
        self.lookup(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let pos = self.bitmap.rank(index)?;
        self.store.settle();
        self.store.get_mut(pos).map(|(_, value)| value)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bitmap.contains(index)
    }

    /// Append `value` at index `len()` and return the new length.
    pub fn push(&mut self, value: T) -> Result<usize> {
        let index = self.len();
        self.set(index, value)?;
        Ok(index + 1)
    }

    /// One past the highest present index, or zero if the array is empty.
    /// Gaps count towards the length, as they would in a dense array.
    pub fn len(&self) -> usize {
        if let Some(len) = self.len.get() {
            return len;
        }
        let len = self.bitmap.last_one().map_or(0, |index| index + 1);
        self.len.set(Some(len));
        len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of present entries
    pub fn count(&self) -> usize {
        self.store.len()
    }

    /// Number of bitmap chunks allocated so far
    pub fn num_chunks(&self) -> usize {
        self.bitmap.num_chunks()
    }

    /// Call `f` for every index in `0..len()` in ascending order.
    /// Holes are passed to `f` as `None`.
    pub fn for_each(&mut self, mut f: impl FnMut(Option<&T>, usize, &Self)) {
        self.store.settle();
        let this = &*self;
        for index in 0..this.len() {
            f(this.lookup(index), index, this);
        }
    }

    /// Map every index in `0..len()` (holes included) to a new value.
    pub fn map<U>(&mut self, mut f: impl FnMut(Option<&T>, usize, &Self) -> U) -> Vec<U> {
        self.store.settle();
        let this = &*self;
        (0..this.len())
            .map(|index| f(this.lookup(index), index, this))
            .collect()
    }

    pub fn reduce<A>(&mut self, mut f: impl FnMut(A, Option<&T>, usize) -> A, init: A) -> A {
        self.store.settle();
        let this = &*self;
        (0..this.len()).fold(init, |acc, index| f(acc, this.lookup(index), index))
    }

    /// Return the first slot in `0..len()` accepted by `f`.
    ///
    /// Whether a slot matched is tracked apart from its value, so a present
    /// value that looks empty (say `0`) is still found. A predicate that
    /// accepts a hole yields `None`.
    pub fn find(&mut self, mut f: impl FnMut(Option<&T>) -> bool) -> Option<&T> {
        self.store.settle();
        let this = &*self;
        (0..this.len())
            .map(|index| this.lookup(index))
            .find(|&value| f(value))
            .flatten()
    }

    /// Present entries as `(index, value)` pairs in ascending index order.
    pub fn entries(&mut self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.store.settle();
        self.store.iter().map(|(index, value)| (*index, value))
    }

    /// Remove every entry and release the bitmap.
    pub fn clear(&mut self) {
        self.bitmap.clear();
        self.store.clear();
        self.invalidate();
    }

    // Requires a settled store.
    fn lookup(&self, index: usize) -> Option<&T> {
        let pos = self.bitmap.rank(index)?;
        self.store.get(pos).map(|(_, value)| value)
    }

    fn invalidate(&mut self) {
        self.len.set(None);
        debug_assert_eq!(self.bitmap.count_ones(), self.store.len());
    }
}

/// Convert a signed index to an array index, rejecting negative values.
pub fn checked_index(index: i64) -> Result<usize> {
    if index < 0 {
        return Err(SparseArrayError::NegativeIndex { index });
    }
    usize::try_from(index).map_err(|_| SparseArrayError::IndexOverflow {
        index: index as u64,
    })
}
