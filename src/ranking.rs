//! Ranking and Top-K selection over scored entries
//!
//! Ranking is a stable sort: entries with equal scores keep the order in
//! which they were encountered. Top-K uses a bounded heap (O(N log K)) with
//! the same tie rule, so `top_k(k)` always equals the first `k` entries of
//! the full ranking.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{Error, Result};

/// Sort order for ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest score first
    Ascending,
    /// Largest score first
    Descending,
}

impl SortOrder {
    fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Ascending => a.total_cmp(&b),
            Self::Descending => b.total_cmp(&a),
        }
    }
}

/// Stable in-place ranking of `items` by `score`.
pub fn rank_by<T, F>(items: &mut [T], score: F, order: SortOrder)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| order.compare(score(a), score(b)));
}

/// Select the `k` best items by `score`, best first.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `k` is zero.
pub fn top_k<T, F>(items: &[T], k: usize, score: F, order: SortOrder) -> Result<Vec<&T>>
where
    F: Fn(&T) -> f64,
{
    if k == 0 {
        return Err(Error::InvalidInput("k must be greater than 0".to_string()));
    }

    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (index, item) in items.iter().enumerate() {
        heap.push(HeapItem {
            score: score(item),
            index,
            order,
        });
        if heap.len() > k {
            heap.pop();
        }
    }

    Ok(heap
        .into_sorted_vec()
        .into_iter()
        .map(|entry| &items[entry.index])
        .collect())
}

// Greater means worse: the heap top is the entry to evict next.
#[derive(Debug)]
struct HeapItem {
    score: f64,
    index: usize,
    order: SortOrder,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order
            .compare(self.score, other.score)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_descending_stable() {
        let mut items = vec![("a", 0.5), ("b", 0.9), ("c", 0.5), ("d", 0.1)];
        rank_by(&mut items, |item| item.1, SortOrder::Descending);
        let names: Vec<&str> = items.iter().map(|item| item.0).collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_rank_ascending() {
        let mut items = vec![3.0, 1.0, 2.0];
        rank_by(&mut items, |x| *x, SortOrder::Ascending);
        assert_eq!(items, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_top_k_descending() {
        let items = vec![1.0, 5.0, 3.0, 9.0, 2.0];
        let top = top_k(&items, 3, |x| *x, SortOrder::Descending).unwrap();
        assert_eq!(top, vec![&9.0, &5.0, &3.0]);
    }

    #[test]
    fn test_top_k_ascending() {
        let items = vec![1.0, 5.0, 3.0, 9.0, 2.0];
        let top = top_k(&items, 2, |x| *x, SortOrder::Ascending).unwrap();
        assert_eq!(top, vec![&1.0, &2.0]);
    }

    #[test]
    fn test_top_k_ties_keep_encounter_order() {
        let items = vec![("x", 0.7), ("y", 0.7), ("z", 0.7)];
        let top = top_k(&items, 2, |item| item.1, SortOrder::Descending).unwrap();
        assert_eq!(top[0].0, "x");
        assert_eq!(top[1].0, "y");
    }

    #[test]
    fn test_top_k_larger_than_input() {
        let items = vec![2.0, 1.0];
        let top = top_k(&items, 10, |x| *x, SortOrder::Descending).unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_top_k_zero_rejected() {
        let items = vec![1.0];
        assert!(matches!(
            top_k(&items, 0, |x| *x, SortOrder::Descending),
            Err(Error::InvalidInput(_))
        ));
    }
}
