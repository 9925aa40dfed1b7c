#![forbid(unsafe_code)]

//! Set-style differences between maps and flat lists.
//!
//! Used by the patch engine for attributes, styles, listeners (maps) and class
//! tokens (lists).

use std::collections::BTreeMap;

/// Key-level difference between two maps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectsDiff<'a> {
    /// Keys present only in the new map.
    pub added: Vec<&'a str>,
    /// Keys present only in the old map.
    pub removed: Vec<&'a str>,
    /// Keys present in both whose values differ under the predicate.
    pub updated: Vec<&'a str>,
}

impl ObjectsDiff<'_> {
    /// No key was added, removed or updated.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Compare two string-keyed maps.
///
/// `same` decides whether a value kept under the same key is unchanged; pass
/// `PartialEq::eq` for plain values or a pointer comparison for callbacks.
pub fn objects_diff<'a, V, F>(
    old: &'a BTreeMap<String, V>,
    new: &'a BTreeMap<String, V>,
    same: F,
) -> ObjectsDiff<'a>
where
    F: Fn(&V, &V) -> bool,
{
    let mut diff = ObjectsDiff::default();
    for (key, value) in new {
        match old.get(key) {
            None => diff.added.push(key.as_str()),
            Some(previous) if !same(previous, value) => diff.updated.push(key.as_str()),
            Some(_) => {}
        }
    }
    diff.removed = old
        .keys()
        .filter(|key| !new.contains_key(*key))
        .map(String::as_str)
        .collect();
    diff
}

/// Membership difference between two lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArraysDiff<T> {
    /// Items of the new list missing from the old one.
    pub added: Vec<T>,
    /// Items of the old list missing from the new one.
    pub removed: Vec<T>,
}

/// Compare two lists by membership, ignoring order.
pub fn arrays_diff<T: PartialEq + Clone>(old: &[T], new: &[T]) -> ArraysDiff<T> {
    ArraysDiff {
        added: new.iter().filter(|item| !old.contains(item)).cloned().collect(),
        removed: old.iter().filter(|item| !new.contains(item)).cloned().collect(),
    }
}

/// Split a class attribute into its non-blank tokens.
pub fn class_tokens(classes: &str) -> Vec<String> {
    classes.split_whitespace().map(str::to_owned).collect()
}
