// Position-stable sparse index: removal drops a key, never renumbers the rest.
use std::collections::BTreeMap;

/// Maps permanent 0-based positions to values.
///
/// Positions are assigned in insertion order when the index is built and are
/// never reused. `bound` is the number of positions assigned at build time; it
/// stays fixed as entries are removed, so walks over the index cover the same
/// position range for the index's whole lifetime.
#[derive(Clone, Debug, Default)]
pub struct SparseIndex<T> {
    entries: BTreeMap<usize, T>,
    bound: usize,
}

impl<T> SparseIndex<T> {
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Entries still present.
    pub fn live_len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.entries.get(&position)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.entries.contains_key(&position)
    }

    /// Removes `position`. Absent positions are left alone.
    pub fn remove(&mut self, position: usize) -> Option<T> {
        self.entries.remove(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.entries.iter().map(|(position, value)| (*position, value))
    }
}

impl<T> FromIterator<T> for SparseIndex<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let entries: BTreeMap<usize, T> = iter.into_iter().enumerate().collect();
        let bound = entries.len();
        Self { entries, bound }
    }
}

#[cfg(test)]
mod tests {
    use super::SparseIndex;

    #[test]
    fn positions_follow_insertion_order() {
        let index: SparseIndex<&str> = ["a", "b", "c"].into_iter().collect();
        assert_eq!(index.bound(), 3);
        assert_eq!(index.get(0), Some(&"a"));
        assert_eq!(index.get(2), Some(&"c"));
        assert_eq!(index.get(3), None);
    }

    #[test]
    fn removal_keeps_neighbors_and_bound() {
        let mut index: SparseIndex<u32> = (10..15).collect();
        assert_eq!(index.remove(2), Some(12));
        assert_eq!(index.remove(2), None);
        assert_eq!(index.get(1), Some(&11));
        assert_eq!(index.get(3), Some(&13));
        assert!(!index.contains(2));
        assert_eq!(index.live_len(), 4);
        assert_eq!(index.bound(), 5);
    }

    #[test]
    fn removing_past_bound_is_noop() {
        let mut index: SparseIndex<u32> = (0..2).collect();
        assert_eq!(index.remove(9), None);
        assert_eq!(index.live_len(), 2);
    }

    #[test]
    fn iter_skips_removed() {
        let mut index: SparseIndex<char> = "abcd".chars().collect();
        index.remove(1);
        let positions: Vec<usize> = index.iter().map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![0, 2, 3]);
    }
}
