//! In-place compaction of a vector under a predicate.
//!
//! `swap_erase` and `move_erase` drop every element the predicate matches
//! without keeping the relative order of the survivors. Matching elements are
//! exchanged with (or overwritten by) elements from the tail, so each removal
//! costs one transfer instead of shifting everything behind it. When order
//! matters use `remove_erase`, which is the stable `retain` idiom.
//!
//! All three return the number of removed elements.

use std::fmt;

/// Removes matching elements by swapping them into a shrinking tail, then
/// truncating the tail in one go.
pub fn swap_erase<T, F>(v: &mut Vec<T>, mut pred: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let len = v.len();
    // Everything in `end..len` is waiting to be dropped.
    let mut end = len;
    let mut i = 0;

    while i < end {
        if pred(&v[i]) {
            end -= 1;
            v.swap(i, end);
            // `i` now holds an unclassified element from the tail.
        } else {
            i += 1;
        }
    }

    v.truncate(end);
    len - end
}

/// Removes matching elements by dropping them in place and moving the last
/// live element into the freed slot.
pub fn move_erase<T, F>(v: &mut Vec<T>, mut pred: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let len = v.len();
    let mut i = 0;

    while i < v.len() {
        if pred(&v[i]) {
            drop(v.swap_remove(i));
        } else {
            i += 1;
        }
    }

    len - v.len()
}

/// Stable baseline: shifts survivors down, preserving their order.
pub fn remove_erase<T, F>(v: &mut Vec<T>, mut pred: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let len = v.len();
    v.retain(|x| !pred(x));
    len - v.len()
}

// =============================================================================
// Strategy selection
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EraseStrategy {
    RemoveErase,
    SwapErase,
    MoveErase,
}

impl EraseStrategy {
    /// Baseline first; speed-ups are reported relative to it.
    pub const ALL: [EraseStrategy; 3] = [
        EraseStrategy::RemoveErase,
        EraseStrategy::SwapErase,
        EraseStrategy::MoveErase,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EraseStrategy::RemoveErase => "remove-erase",
            EraseStrategy::SwapErase => "swap-erase",
            EraseStrategy::MoveErase => "move-erase",
        }
    }

    pub fn is_stable(self) -> bool {
        matches!(self, EraseStrategy::RemoveErase)
    }

    pub fn apply<T, F>(self, v: &mut Vec<T>, pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        match self {
            EraseStrategy::RemoveErase => remove_erase(v, pred),
            EraseStrategy::SwapErase => swap_erase(v, pred),
            EraseStrategy::MoveErase => move_erase(v, pred),
        }
    }
}

impl fmt::Display for EraseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
