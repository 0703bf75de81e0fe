//! Kaplan-Zwick soft heap.
//!
//! A soft heap trades exactness for speed: `extract_min` may return an item
//! whose key has been *corrupted* (raised to a larger common key, the `ckey`).
//! With error parameter `r`, at most `n / 2^r` items are corrupted at any
//! time, `n` being the number of insertions. Nodes of rank at most `r + 3`
//! hold a single item, so heaps smaller than `2^(r+4)` behave as exact
//! priority queues.
//!
//! Trees are binary, stored as owned boxes; the root list is kept sorted by
//! rank and melded with the same carry rule as a binomial heap.

use std::cmp::Ordering;

/// Ranks above `r` that still hold single items.
const EXACT_RANKS: u32 = 3;

/// An item extracted from a [`SoftHeap`].
#[derive(Debug, Clone, PartialEq)]
pub struct SoftHeapEntry<K, V> {
    /// Original key of the item.
    pub key: K,
    /// Associated value.
    pub value: V,
    /// Corrupted key the item was extracted under (`ckey >= key`).
    pub ckey: K,
}

impl<K: PartialOrd, V> SoftHeapEntry<K, V> {
    /// True when the item's key was raised inside the heap.
    pub fn is_corrupted(&self) -> bool {
        self.ckey > self.key
    }
}

#[derive(Debug)]
struct Node<K, V> {
    rank: u32,
    target: usize,
    ckey: K,
    items: Vec<(K, V)>,
    left: Option<Box<Node<K, V>>>,
    right: Option<Box<Node<K, V>>>,
}

impl<K, V> Node<K, V> {
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

fn less<K: PartialOrd>(a: &K, b: &K) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Less))
}

fn sift<K: PartialOrd + Clone, V>(node: &mut Node<K, V>) {
    while node.items.len() < node.target && !node.is_leaf() {
        let swap = match (&node.left, &node.right) {
            (None, Some(_)) => true,
            (Some(l), Some(r)) => less(&r.ckey, &l.ckey),
            _ => false,
        };
        if swap {
            std::mem::swap(&mut node.left, &mut node.right);
        }
        let Some(left) = node.left.as_mut() else {
            break;
        };
        node.items.append(&mut left.items);
        node.ckey = left.ckey.clone();
        let exhausted = if left.is_leaf() {
            true
        } else {
            sift(left);
            left.items.is_empty()
        };
        if exhausted {
            node.left = None;
        }
    }
}

/// Soft priority queue with error parameter `r`.
///
/// Node targets grow by half per rank above `r + 3`.
///
/// # Example
///
/// ```
/// use analytics_core::math::soft_heap::SoftHeap;
///
/// let mut heap = SoftHeap::new(8);
/// for key in [5.0, 1.0, 3.0] {
///     heap.insert(key, key as i32);
/// }
/// let first = heap.extract_min().unwrap();
/// assert_eq!(first.key, 1.0);
/// assert_eq!(heap.len(), 2);
/// ```
#[derive(Debug)]
pub struct SoftHeap<K, V> {
    r: u32,
    trees: Vec<Box<Node<K, V>>>,
    len: usize,
}

impl<K: PartialOrd + Clone, V> SoftHeap<K, V> {
    /// Empty heap with error parameter `r`.
    pub fn new(r: u32) -> Self {
        Self {
            r,
            trees: Vec::new(),
            len: 0,
        }
    }

    /// Error parameter.
    pub fn r(&self) -> u32 {
        self.r
    }

    /// Upper bound `ε = 1 / 2^r` on the corrupted fraction.
    pub fn error_rate(&self) -> f64 {
        2f64.powi(-(self.r.min(1023) as i32))
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no items are held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of root trees.
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// `(rank, ckey, item count)` of each root, in rank order.
    pub fn roots(&self) -> impl Iterator<Item = (u32, &K, usize)> + '_ {
        self.trees.iter().map(|t| (t.rank, &t.ckey, t.items.len()))
    }

    fn target_size(&self, rank: u32) -> usize {
        let mut size = 1usize;
        for _ in self.r.saturating_add(EXACT_RANKS)..rank {
            size = (3 * size).div_ceil(2);
        }
        size
    }

    /// Insert `value` under `key`.
    pub fn insert(&mut self, key: K, value: V) {
        let leaf = Box::new(Node {
            rank: 0,
            target: 1,
            ckey: key.clone(),
            items: vec![(key, value)],
            left: None,
            right: None,
        });
        self.len += 1;
        self.merge_trees(vec![leaf]);
    }

    /// Absorb every item of `other`.
    ///
    /// Node targets of `other` are reset to this heap's `r`; items already
    /// corrupted under `other.r` keep their ckeys.
    pub fn meld(&mut self, mut other: SoftHeap<K, V>) {
        self.len += other.len;
        let mut trees = std::mem::take(&mut other.trees);
        if other.r != self.r {
            for tree in &mut trees {
                self.retarget(tree);
            }
        }
        self.merge_trees(trees);
    }

    fn retarget(&self, node: &mut Node<K, V>) {
        node.target = self.target_size(node.rank);
        for child in [node.left.as_mut(), node.right.as_mut()].into_iter().flatten() {
            self.retarget(child);
        }
    }

    fn merge_trees(&mut self, incoming: Vec<Box<Node<K, V>>>) {
        let existing = std::mem::take(&mut self.trees);
        let mut merged = Vec::with_capacity(existing.len() + incoming.len());
        let mut a = existing.into_iter().peekable();
        let mut b = incoming.into_iter().peekable();
        loop {
            let take_a = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) => x.rank <= y.rank,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_a { a.next() } else { b.next() };
            merged.extend(next);
        }

        let mut i = 0;
        while i + 1 < merged.len() {
            let rank = merged[i].rank;
            if merged[i + 1].rank != rank {
                i += 1;
                continue;
            }
            if i + 2 < merged.len() && merged[i + 2].rank == rank {
                i += 1;
                continue;
            }
            let y = merged.remove(i + 1);
            let x = std::mem::replace(
                &mut merged[i],
                Box::new(Node {
                    rank: rank + 1,
                    target: self.target_size(rank + 1),
                    ckey: y.ckey.clone(),
                    items: Vec::new(),
                    left: None,
                    right: None,
                }),
            );
            let parent = &mut merged[i];
            parent.ckey = x.ckey.clone();
            parent.left = Some(x);
            parent.right = Some(y);
            sift(parent);
        }
        self.trees = merged;
    }

    /// Remove an item of minimum ckey.
    pub fn extract_min(&mut self) -> Option<SoftHeapEntry<K, V>> {
        let index = self
            .trees
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.ckey.partial_cmp(&b.ckey).unwrap_or(Ordering::Equal))
            .map(|(i, _)| i)?;

        let tree = &mut self.trees[index];
        let (key, value) = tree.items.pop()?;
        let ckey = tree.ckey.clone();
        if tree.items.len() * 2 <= tree.target && !tree.is_leaf() {
            sift(tree);
        }
        if tree.items.is_empty() {
            self.trees.remove(index);
        }
        self.len -= 1;
        Some(SoftHeapEntry { key, value, ckey })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn drain<K: PartialOrd + Clone, V>(heap: &mut SoftHeap<K, V>) -> Vec<SoftHeapEntry<K, V>> {
        std::iter::from_fn(|| heap.extract_min()).collect()
    }

    #[test]
    fn test_exact_when_small() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut heap = SoftHeap::new(20);
        let mut keys: Vec<f64> = (0..500).map(|_| rng.gen()).collect();
        for &k in &keys {
            heap.insert(k, ());
        }
        keys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let extracted: Vec<f64> = drain(&mut heap).into_iter().map(|e| e.key).collect();
        assert_eq!(extracted, keys);
    }

    #[test]
    fn test_ckeys_dominate_and_nondecreasing() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut heap = SoftHeap::new(2);
        for i in 0..2000 {
            heap.insert(rng.gen::<f64>(), i);
        }
        let entries = drain(&mut heap);
        assert_eq!(entries.len(), 2000);
        assert!(entries.iter().all(|e| e.ckey >= e.key));
        assert!(entries.windows(2).all(|w| w[0].ckey <= w[1].ckey));
        assert!(entries.iter().any(SoftHeapEntry::is_corrupted));
    }

    #[test]
    fn test_meld_preserves_items() {
        let mut first = SoftHeap::new(4);
        let mut second = SoftHeap::new(4);
        for i in 0..100u32 {
            first.insert(f64::from(i), i);
            second.insert(f64::from(i) + 0.5, i);
        }
        first.meld(second);
        assert_eq!(first.len(), 200);
        let mut values: Vec<u32> = drain(&mut first).into_iter().map(|e| e.value).collect();
        values.sort_unstable();
        assert_eq!(values.len(), 200);
        assert!(first.is_empty());
        assert_eq!(first.tree_count(), 0);
    }

    #[test]
    fn test_root_ranks_sorted() {
        let mut heap = SoftHeap::new(3);
        for i in 0..77 {
            heap.insert(i, i);
        }
        let ranks: Vec<u32> = heap.roots().map(|(rank, _, _)| rank).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(heap.error_rate(), 0.125);
    }

    fn corrupted_in<K: PartialOrd, V>(node: &Node<K, V>) -> usize {
        let own = node.items.iter().filter(|(key, _)| less(key, &node.ckey)).count();
        own + [node.left.as_deref(), node.right.as_deref()]
            .into_iter()
            .flatten()
            .map(corrupted_in)
            .sum::<usize>()
    }

    fn corrupted<K: PartialOrd, V>(heap: &SoftHeap<K, V>) -> usize {
        heap.trees.iter().map(|t| corrupted_in(t)).sum()
    }

    #[test]
    fn test_corruption_within_error_rate() {
        for r in 1..=4 {
            let mut rng = StdRng::seed_from_u64(u64::from(r));
            let mut heap = SoftHeap::new(r);
            let mut inserted = 0usize;
            let mut worst = 0usize;
            for _ in 0..2048 {
                heap.insert(rng.gen::<f64>(), ());
                inserted += 1;
                let count = corrupted(&heap);
                assert!(count as f64 <= heap.error_rate() * inserted as f64);
                worst = worst.max(count);
            }
            for _ in 0..1024 {
                heap.extract_min();
                let count = corrupted(&heap);
                assert!(count as f64 <= heap.error_rate() * inserted as f64);
            }
            assert!(worst > 0);
        }
    }

    fn max_target<K, V>(node: &Node<K, V>) -> usize {
        [node.left.as_deref(), node.right.as_deref()]
            .into_iter()
            .flatten()
            .map(max_target)
            .fold(node.target, usize::max)
    }

    #[test]
    fn test_meld_adopts_receiver_r() {
        let mut coarse = SoftHeap::new(0);
        for i in 0..256u32 {
            coarse.insert(f64::from(i), i);
        }
        assert!(coarse.trees.iter().any(|t| max_target(t) > 1));
        let mut fine = SoftHeap::new(12);
        fine.meld(coarse);
        assert_eq!(fine.r(), 12);
        assert!(fine.trees.iter().all(|t| max_target(t) == 1));
        assert_eq!(drain(&mut fine).len(), 256);
    }

    #[test]
    fn test_empty_extract() {
        let mut heap: SoftHeap<i32, ()> = SoftHeap::new(5);
        assert!(heap.extract_min().is_none());
    }
}
