//! Identity-keyed diff between two result snapshots

use std::collections::{HashMap, HashSet};

use super::types::ItemId;

/// Batch of row operations turning one ordered id list into another.
///
/// Applied in two phases: every `removed` and every `moved` source row is
/// taken out, then `inserted` and `moved` destinations are placed in
/// ascending order of their new index. Rows untouched by either list keep
/// their relative order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Old indices that no longer exist, ascending
    pub removed: Vec<usize>,
    /// New indices with no counterpart in the old list, ascending
    pub inserted: Vec<usize>,
    /// (old index, new index) pairs whose relative order changed
    pub moved: Vec<(usize, usize)>,
}

impl SnapshotDiff {
    pub fn between(old: &[ItemId], new: &[ItemId]) -> Self {
        // Pair duplicates in order of appearance
        let mut positions: HashMap<ItemId, Vec<usize>> = HashMap::new();
        for (i, id) in old.iter().enumerate().rev() {
            positions.entry(*id).or_default().push(i);
        }

        let mut matched_old = vec![false; old.len()];
        let mut inserted = Vec::new();
        let mut common: Vec<(usize, usize)> = Vec::new();

        for (j, id) in new.iter().enumerate() {
            match positions.get_mut(id).and_then(|slots| slots.pop()) {
                Some(i) => {
                    matched_old[i] = true;
                    common.push((i, j));
                }
                None => inserted.push(j),
            }
        }

        let removed = matched_old
            .iter()
            .enumerate()
            .filter(|(_, matched)| !**matched)
            .map(|(i, _)| i)
            .collect();

        let old_order: Vec<usize> = common.iter().map(|(i, _)| *i).collect();
        let stable = longest_increasing(&old_order);
        let moved = common
            .iter()
            .enumerate()
            .filter(|(k, _)| !stable.contains(k))
            .map(|(_, pair)| *pair)
            .collect();

        Self {
            removed,
            inserted,
            moved,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty() && self.moved.is_empty()
    }

    /// Rebuild `old` into the new order. Moved rows are carried over,
    /// inserted rows come from `make(new_index)`.
    pub fn apply<R>(&self, old: Vec<R>, mut make: impl FnMut(usize) -> R) -> Vec<R> {
        let removed: HashSet<usize> = self.removed.iter().copied().collect();
        let move_targets: HashMap<usize, usize> = self.moved.iter().copied().collect();

        let mut rows = Vec::with_capacity(old.len());
        let mut carried: HashMap<usize, R> = HashMap::with_capacity(self.moved.len());
        for (i, row) in old.into_iter().enumerate() {
            if let Some(&j) = move_targets.get(&i) {
                carried.insert(j, row);
            } else if !removed.contains(&i) {
                rows.push(row);
            }
        }

        let mut placements: Vec<usize> = self
            .inserted
            .iter()
            .copied()
            .chain(self.moved.iter().map(|(_, j)| *j))
            .collect();
        placements.sort_unstable();

        for j in placements {
            let row = carried.remove(&j).unwrap_or_else(|| make(j));
            let at = j.min(rows.len());
            rows.insert(at, row);
        }
        rows
    }
}

/// Positions (into `seq`) of one longest strictly increasing subsequence.
fn longest_increasing(seq: &[usize]) -> HashSet<usize> {
    // tails[k] = position of the smallest tail of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (pos, value) in seq.iter().enumerate() {
        let len = tails.partition_point(|&t| seq[t] < *value);
        if len > 0 {
            prev[pos] = Some(tails[len - 1]);
        }
        if len == tails.len() {
            tails.push(pos);
        } else {
            tails[len] = pos;
        }
    }

    let mut stable = HashSet::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(pos) = cursor {
        stable.insert(pos);
        cursor = prev[pos];
    }
    stable
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<ItemId> {
        raw.iter().copied().map(ItemId).collect()
    }

    fn replay(old: &[u64], new: &[u64]) -> (SnapshotDiff, Vec<ItemId>) {
        let (old, new) = (ids(old), ids(new));
        let diff = SnapshotDiff::between(&old, &new);
        let rows = diff.apply(old.clone(), |j| new[j]);
        (diff, rows)
    }

    #[test]
    fn empty_to_results_is_all_inserts() {
        let (diff, rows) = replay(&[], &[1, 2, 3]);
        assert_eq!(diff.inserted, vec![0, 1, 2]);
        assert!(diff.removed.is_empty());
        assert!(diff.moved.is_empty());
        assert_eq!(rows, ids(&[1, 2, 3]));
    }

    #[test]
    fn results_to_empty_is_all_removes() {
        let (diff, rows) = replay(&[1, 2, 3], &[]);
        assert_eq!(diff.removed, vec![0, 1, 2]);
        assert!(diff.inserted.is_empty());
        assert!(rows.is_empty());
    }

    #[test]
    fn reorder_with_same_membership_only_moves() {
        let (diff, rows) = replay(&[1, 2, 3, 4], &[4, 1, 2, 3]);
        assert!(diff.removed.is_empty());
        assert!(diff.inserted.is_empty());
        assert_eq!(diff.moved, vec![(3, 0)]);
        assert_eq!(rows, ids(&[4, 1, 2, 3]));
    }

    #[test]
    fn identical_lists_produce_no_operations() {
        let (diff, rows) = replay(&[5, 6, 7], &[5, 6, 7]);
        assert!(diff.is_empty());
        assert_eq!(rows, ids(&[5, 6, 7]));
    }

    #[test]
    fn mixed_changes_land_in_new_order() {
        let (diff, rows) = replay(&[1, 2, 3, 4, 5], &[6, 4, 2, 7, 1]);
        assert_eq!(diff.removed, vec![2, 4]);
        assert_eq!(diff.inserted, vec![0, 3]);
        assert_eq!(rows, ids(&[6, 4, 2, 7, 1]));
    }

    #[test]
    fn duplicate_ids_pair_in_order() {
        let (_, rows) = replay(&[0, 1, 0], &[0, 0, 2]);
        assert_eq!(rows, ids(&[0, 0, 2]));
    }

    #[test]
    fn every_reordering_of_four_rows_applies_cleanly() {
        let base = [1u64, 2, 3, 4];
        let mut order = base;
        // Heap's algorithm, iterative
        let mut c = [0usize; 4];
        let mut i = 0;
        let mut seen = 1;
        let (_, rows) = replay(&base, &order);
        assert_eq!(rows, ids(&order));
        while i < 4 {
            if c[i] < i {
                if i % 2 == 0 {
                    order.swap(0, i);
                } else {
                    order.swap(c[i], i);
                }
                let (diff, rows) = replay(&base, &order);
                assert_eq!(rows, ids(&order), "diff {diff:?}");
                assert!(diff.inserted.is_empty() && diff.removed.is_empty());
                seen += 1;
                c[i] += 1;
                i = 0;
            } else {
                c[i] = 0;
                i += 1;
            }
        }
        assert_eq!(seen, 24);
    }
}
