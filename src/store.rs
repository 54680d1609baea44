// Dense backing store holding only the present values of a sparse array,
// each tagged with its original index. New entries are appended and the
// store is sorted lazily, the next time someone needs to address it by rank.

use log::debug;

/// Whether the entries are known to be in ascending index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Sorted,
    Dirty,
}

#[derive(Debug, Clone)]
pub struct DenseStore<T> {
    entries: Vec<(usize, T)>,
    order: Order,
}

impl<T> Default for DenseStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DenseStore<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            order: Order::Sorted,
        }
    }

    /// Append a new entry without restoring the order. Appending past the
    /// current last index keeps the store sorted.
    pub fn append(&mut self, index: usize, value: T) {
        if let Some(&(last, _)) = self.entries.last() {
            if last > index {
                self.order = Order::Dirty;
            }
        }
        self.entries.push((index, value));
    }

    /// Sort the entries by index if they may be out of order.
    pub fn settle(&mut self) {
        if self.order == Order::Dirty {
            debug!("sorting {} dense entries", self.entries.len());
            self.entries.sort_by_key(|&(index, _)| index);
            self.order = Order::Sorted;
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Entry at rank position `pos`. The store must be settled.
    pub fn get(&self, pos: usize) -> Option<&(usize, T)> {
        debug_assert_eq!(self.order, Order::Sorted);
        self.entries.get(pos)
    }

    pub fn get_mut(&mut self, pos: usize) -> Option<&mut (usize, T)> {
        debug_assert_eq!(self.order, Order::Sorted);
        self.entries.get_mut(pos)
    }

    /// Replace the value at rank position `pos`, returning the old one.
    pub fn replace(&mut self, pos: usize, value: T) -> T {
        debug_assert_eq!(self.order, Order::Sorted);
        std::mem::replace(&mut self.entries[pos].1, value)
    }

    /// Remove the entry at rank position `pos`, keeping the rest in order.
    pub fn remove(&mut self, pos: usize) -> (usize, T) {
        debug_assert_eq!(self.order, Order::Sorted);
        self.entries.remove(pos)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, T)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order = Order::Sorted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_appends_stay_sorted() {
        let mut s = DenseStore::new();
        s.append(1, 'a');
        s.append(5, 'b');
        s.append(9, 'c');
        assert_eq!(s.order(), Order::Sorted);
        assert_eq!(s.get(1), Some(&(5, 'b')));
    }

    #[test]
    fn test_settle() {
        let mut s = DenseStore::new();
        s.append(9, "v9");
        s.append(6, "v6");
        s.append(7, "v7");
        assert_eq!(s.order(), Order::Dirty);
        s.settle();
        assert_eq!(s.order(), Order::Sorted);
        let indices: Vec<usize> = s.iter().map(|&(i, _)| i).collect();
        assert_eq!(indices, [6, 7, 9]);
        assert_eq!(s.get(2), Some(&(9, "v9")));
    }

    #[test]
    fn test_replace_and_remove() {
        let mut s = DenseStore::new();
        s.append(2, 20);
        s.append(4, 40);
        assert_eq!(s.replace(1, 41), 40);
        assert_eq!(s.remove(0), (2, 20));
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(0), Some(&(4, 41)));
        s.clear();
        assert!(s.is_empty());
    }
}
