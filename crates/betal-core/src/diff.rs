#![forbid(unsafe_code)]

//! Keyed-list diffing between two sibling sequences.
//!
//! [`diff_sequence`] produces an ordered edit script that, applied left to
//! right to a working copy of the old sequence, reproduces the new sequence
//! while keeping matched items (so already-mounted nodes are reused instead of
//! remounted).
//!
//! # Algorithm
//!
//! Scan the new sequence by target index `i`, against a working copy of the
//! old sequence that also remembers each remaining item's original index:
//! 1. Working item at `i` has no counterpart anywhere in the new sequence:
//!    emit `Remove`, delete it, retry the same `i`.
//! 2. Working item at `i` equals the new item at `i`: emit `Noop`.
//! 3. New item at `i` has no match in the working copy from `i` onwards:
//!    emit `Add` and insert it at `i`.
//! 4. Otherwise the first forward match is moved to `i`: emit `Move` carrying
//!    its original index.
//! 5. Leftover working items past the new length are removed in order.
//!
//! Matching always takes the first forward match; there is no lookahead to
//! minimise moves. Worst case is O(n·m).
//!
//! # Usage
//!
//! ```
//! use betal_core::diff::{DiffOp, diff_sequence};
//!
//! let ops = diff_sequence(&['a', 'b', 'c'], &['c', 'a', 'b'], |x, y| x == y);
//! assert_eq!(
//!     ops,
//!     vec![
//!         DiffOp::Move { original_index: 2, from: 2, index: 0 },
//!         DiffOp::Noop { original_index: 0, index: 1 },
//!         DiffOp::Noop { original_index: 1, index: 2 },
//!     ]
//! );
//! ```

/// One step of an edit script.
///
/// `index` is always the position in the working copy (and, for everything
/// but `Remove`, in the new sequence). `original_index` addresses the item in
/// the *old* sequence, which stays valid while the working copy shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    /// Insert `new[index]` at `index`.
    Add {
        /// Target position.
        index: usize,
    },
    /// Remove the working item at `index` (`old[original_index]`).
    Remove {
        /// Position in the working copy.
        index: usize,
        /// Position in the old sequence.
        original_index: usize,
    },
    /// Move `old[original_index]` from working position `from` to `index`.
    Move {
        /// Position in the old sequence.
        original_index: usize,
        /// Current position in the working copy.
        from: usize,
        /// Target position.
        index: usize,
    },
    /// `old[original_index]` already sits at `index`.
    Noop {
        /// Position in the old sequence.
        original_index: usize,
        /// Position in both the working copy and the new sequence.
        index: usize,
    },
}

impl DiffOp {
    /// Target (working copy) index of this operation.
    #[inline]
    pub const fn index(&self) -> usize {
        match *self {
            Self::Add { index }
            | Self::Remove { index, .. }
            | Self::Move { index, .. }
            | Self::Noop { index, .. } => index,
        }
    }

    /// Whether this operation leaves the live tree structure untouched.
    #[inline]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }
}

/// Working copy of the old sequence.
///
/// Slots hold the original index of an old item, or `None` for items the
/// script added. Added items always sit before the scan position, so every
/// slot at or after it refers to an old item.
struct WorkingCopy<'a, A, B, F> {
    old: &'a [A],
    slots: Vec<Option<usize>>,
    eq: F,
    _new: std::marker::PhantomData<fn(&B)>,
}

impl<'a, A, B, F> WorkingCopy<'a, A, B, F>
where
    F: Fn(&A, &B) -> bool,
{
    fn new(old: &'a [A], eq: F) -> Self {
        Self {
            old,
            slots: (0..old.len()).map(Some).collect(),
            eq,
            _new: std::marker::PhantomData,
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn original_at(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied().flatten()
    }

    /// The item at `index` has no counterpart anywhere in `new`.
    fn is_removal(&self, index: usize, new: &[B]) -> Option<usize> {
        let original = self.original_at(index)?;
        let item = &self.old[original];
        if new.iter().any(|candidate| (self.eq)(item, candidate)) {
            None
        } else {
            Some(original)
        }
    }

    fn remove(&mut self, index: usize, original_index: usize) -> DiffOp {
        self.slots.remove(index);
        DiffOp::Remove {
            index,
            original_index,
        }
    }

    fn is_noop(&self, index: usize, new: &[B]) -> Option<usize> {
        let original = self.original_at(index)?;
        let target = new.get(index)?;
        (self.eq)(&self.old[original], target).then_some(original)
    }

    /// First working position at or after `from` holding an item equal to `item`.
    fn find_index_from(&self, item: &B, from: usize) -> Option<usize> {
        (from..self.len()).find(|&i| {
            self.original_at(i)
                .is_some_and(|original| (self.eq)(&self.old[original], item))
        })
    }

    fn add(&mut self, index: usize) -> DiffOp {
        self.slots.insert(index, None);
        DiffOp::Add { index }
    }

    fn move_to(&mut self, from: usize, index: usize, original_index: usize) -> DiffOp {
        let slot = self.slots.remove(from);
        self.slots.insert(index, slot);
        DiffOp::Move {
            original_index,
            from,
            index,
        }
    }

    fn remove_items_after(&mut self, index: usize, ops: &mut Vec<DiffOp>) {
        while self.len() > index {
            match self.original_at(index) {
                Some(original_index) => ops.push(self.remove(index, original_index)),
                None => {
                    self.slots.remove(index);
                }
            }
        }
    }
}

/// Compute the edit script turning `old` into `new`.
///
/// `eq` is the identity predicate: two items are "the same slot" when it
/// returns `true`.
pub fn diff_sequence<A, B, F>(old: &[A], new: &[B], eq: F) -> Vec<DiffOp>
where
    F: Fn(&A, &B) -> bool,
{
    let _span = crate::debug_span!("diff_sequence", old_len = old.len(), new_len = new.len());
    let _guard = _span.enter();

    let mut ops = Vec::with_capacity(old.len().max(new.len()));
    let mut working = WorkingCopy::new(old, eq);
    let mut index = 0;

    while index < new.len() {
        if let Some(original_index) = working.is_removal(index, new) {
            ops.push(working.remove(index, original_index));
            continue;
        }

        if let Some(original_index) = working.is_noop(index, new) {
            ops.push(DiffOp::Noop {
                original_index,
                index,
            });
            index += 1;
            continue;
        }

        match working.find_index_from(&new[index], index) {
            None => ops.push(working.add(index)),
            Some(from) => {
                let original_index = working.original_at(from).unwrap_or(from);
                ops.push(working.move_to(from, index, original_index));
            }
        }
        index += 1;
    }

    working.remove_items_after(new.len(), &mut ops);

    crate::trace!(ops = ops.len(), "diff sequence computed");
    ops
}

/// Replay `ops` against a copy of `old`.
///
/// `Add` takes its item from `new`; every other operation reuses the item
/// already in the working copy. For a script produced by [`diff_sequence`]
/// with an equality predicate, the result equals `new`.
///
/// # Panics
///
/// Panics if an operation addresses a position outside the working copy or
/// an `Add` index outside `new`, which cannot happen for a script that
/// [`diff_sequence`] produced for the same `old` and `new`.
pub fn apply_sequence<T: Clone>(old: &[T], new: &[T], ops: &[DiffOp]) -> Vec<T> {
    let mut working = old.to_vec();
    for op in ops {
        match *op {
            DiffOp::Add { index } => working.insert(index, new[index].clone()),
            DiffOp::Remove { index, .. } => {
                working.remove(index);
            }
            DiffOp::Move { from, index, .. } => {
                let item = working.remove(from);
                working.insert(index, item);
            }
            DiffOp::Noop { .. } => {}
        }
    }
    working
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn same(a: &i32, b: &i32) -> bool {
        a == b
    }

    #[test]
    #[should_panic(expected = "index")]
    fn foreign_script_panics_on_out_of_range_add() {
        apply_sequence(&[1], &[1], &[DiffOp::Add { index: 3 }]);
    }

    #[test]
    fn identical_sequences_are_all_noops() {
        let ops = diff_sequence(&[1, 2, 3], &[1, 2, 3], same);
        assert_eq!(ops.len(), 3);
        assert!(ops.iter().all(DiffOp::is_noop));
    }

    #[test]
    fn rotate_right_is_one_move() {
        let ops = diff_sequence(&['a', 'b', 'c'], &['c', 'a', 'b'], |x, y| x == y);
        let moves = ops
            .iter()
            .filter(|op| matches!(op, DiffOp::Move { .. }))
            .count();
        let noops = ops.iter().filter(|op| op.is_noop()).count();
        assert_eq!(moves, 1);
        assert_eq!(noops, 2);
        assert_eq!(
            ops[0],
            DiffOp::Move {
                original_index: 2,
                from: 2,
                index: 0
            }
        );
    }

    #[test]
    fn removal_retries_same_index() {
        let ops = diff_sequence(&[1, 2, 3], &[2, 3], same);
        assert_eq!(
            ops,
            vec![
                DiffOp::Remove {
                    index: 0,
                    original_index: 0
                },
                DiffOp::Noop {
                    original_index: 1,
                    index: 0
                },
                DiffOp::Noop {
                    original_index: 2,
                    index: 1
                },
            ]
        );
    }

    #[test]
    fn addition_into_middle() {
        let ops = diff_sequence(&[1, 3], &[1, 2, 3], same);
        assert_eq!(
            ops,
            vec![
                DiffOp::Noop {
                    original_index: 0,
                    index: 0
                },
                DiffOp::Add { index: 1 },
                DiffOp::Noop {
                    original_index: 1,
                    index: 2
                },
            ]
        );
    }

    #[test]
    fn trailing_items_removed_in_order() {
        let ops = diff_sequence(&[1, 2, 3, 4], &[1, 2], same);
        assert_eq!(
            &ops[2..],
            &[
                DiffOp::Remove {
                    index: 2,
                    original_index: 2
                },
                DiffOp::Remove {
                    index: 2,
                    original_index: 3
                },
            ]
        );
    }

    #[test]
    fn empty_old_is_all_adds() {
        let ops = diff_sequence(&[], &[1, 2], same);
        assert_eq!(ops, vec![DiffOp::Add { index: 0 }, DiffOp::Add { index: 1 }]);
    }

    #[test]
    fn empty_new_is_all_removes() {
        let ops = diff_sequence(&[1, 2], &[], same);
        assert_eq!(ops.len(), 2);
        assert!(
            ops.iter()
                .all(|op| matches!(op, DiffOp::Remove { index: 0, .. }))
        );
    }

    #[test]
    fn move_carries_original_index_after_shift() {
        // After removing `x`, `c` sits at working index 2 but was originally at 3.
        let ops = diff_sequence(&['x', 'a', 'b', 'c'], &['c', 'a', 'b'], |x, y| x == y);
        assert_eq!(
            ops[1],
            DiffOp::Move {
                original_index: 3,
                from: 2,
                index: 0
            }
        );
    }

    #[test]
    fn heterogeneous_item_types() {
        let old = ["1", "2"];
        let new = [2, 1];
        let ops = diff_sequence(&old, &new, |a: &&str, b: &i32| a.parse::<i32>().ok() == Some(*b));
        assert!(matches!(ops[0], DiffOp::Move { original_index: 1, .. }));
    }

    proptest! {
        /// Diffing a sequence against itself never mutates anything.
        #[test]
        fn self_diff_is_all_noops(a in prop::collection::vec(0u8..6, 0..24)) {
            let ops = diff_sequence(&a, &a, |x, y| x == y);
            prop_assert_eq!(ops.len(), a.len());
            prop_assert!(ops.iter().all(DiffOp::is_noop));
        }

        /// Applying the script reproduces the new sequence exactly.
        #[test]
        fn script_reproduces_target(
            a in prop::collection::vec(0u8..8, 0..20),
            b in prop::collection::vec(0u8..8, 0..20),
        ) {
            let ops = diff_sequence(&a, &b, |x, y| x == y);
            prop_assert_eq!(apply_sequence(&a, &b, &ops), b);
        }

        /// Every original item is consumed by at most one non-add operation.
        #[test]
        fn original_indices_used_once(
            a in prop::collection::vec(0u8..8, 0..20),
            b in prop::collection::vec(0u8..8, 0..20),
        ) {
            let ops = diff_sequence(&a, &b, |x, y| x == y);
            let mut seen = vec![false; a.len()];
            for op in ops {
                let original = match op {
                    DiffOp::Add { .. } => continue,
                    DiffOp::Remove { original_index, .. }
                    | DiffOp::Move { original_index, .. }
                    | DiffOp::Noop { original_index, .. } => original_index,
                };
                prop_assert!(!seen[original]);
                seen[original] = true;
            }
        }
    }
}
