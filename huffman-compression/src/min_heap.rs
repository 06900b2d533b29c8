use std::{cmp::Ordering, collections::BinaryHeap};

/// Min-priority queue keyed by weight.
///
/// Equal weights come out in insertion order, which keeps the tree shape, and
/// so the encoded bytes, identical across runs.
#[derive(Debug)]
pub struct MinHeap<T> {
    entries: BinaryHeap<Entry<T>>,
    inserted: u64,
}

#[derive(Debug)]
struct Entry<T> {
    weight: u64,
    sequence: u64,
    item: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (u64, u64) {
        (self.weight, self.sequence)
    }
}

// BinaryHeap is a max-heap, so the comparison is reversed.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap {
            entries: BinaryHeap::new(),
            inserted: 0,
        }
    }

    pub fn insert(&mut self, weight: u64, item: T) {
        let sequence = self.inserted;
        self.inserted += 1;
        self.entries.push(Entry {
            weight,
            sequence,
            item,
        });
    }

    /// Removes the lightest item, together with its weight.
    pub fn extract_min(&mut self) -> Option<(u64, T)> {
        self.entries.pop().map(|entry| (entry.weight, entry.item))
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::MinHeap;

    #[test]
    fn test_extracts_in_weight_order() {
        let mut heap = MinHeap::new();
        for (weight, name) in [(42, "D"), (2, "Z"), (120, "E"), (7, "K")] {
            heap.insert(weight, name);
        }
        assert_eq!(heap.size(), 4);

        let order = std::iter::from_fn(|| heap.extract_min())
            .map(|(_, name)| name)
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["Z", "K", "D", "E"]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_equal_weights_keep_insertion_order() {
        let mut heap = MinHeap::new();
        heap.insert(5, 'b');
        heap.insert(5, 'a');
        heap.insert(1, 'x');
        heap.insert(5, 'c');

        assert_eq!(heap.extract_min(), Some((1, 'x')));
        assert_eq!(heap.extract_min(), Some((5, 'b')));
        assert_eq!(heap.extract_min(), Some((5, 'a')));
        assert_eq!(heap.extract_min(), Some((5, 'c')));
        assert_eq!(heap.extract_min(), None);
    }
}
