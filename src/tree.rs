//! Depth-first traversal of YAML documents with in-place mutation
//!
//! The walker visits every mapping entry reachable from a root mapping,
//! descending through nested mappings and through sequence elements that
//! are mappings. The visitor may delete, rename, or insert entries in the
//! mapping it is handed while that mapping is being walked.
//!
//! Each mapping's keys are snapshotted before its entries are visited; the
//! visitor always mutates the live mapping, never the snapshot. After a
//! visit the visitor reports where the entry's value now lives through a
//! [`Placement`], and the walker descends into the value at that location.

use serde_yaml::{Mapping, Value};

/// Where a visited entry's value lives after the visitor returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// The entry is still stored under its original key.
    Kept,
    /// The value was moved under a new key in the same mapping.
    Renamed(Value),
    /// The entry was deleted and is not descended into.
    Removed,
}

/// Walk `root`, calling `visit(parent, key)` for every mapping entry.
///
/// The visitor is called before traversal continues into the entry's
/// value. A snapshot key whose slot was taken over by an earlier rename in
/// the same mapping is not visited again.
pub fn walk<F>(root: &mut Mapping, visit: &mut F)
where
    F: FnMut(&mut Mapping, &Value) -> Placement,
{
    let snapshot: Vec<Value> = root.keys().cloned().collect();
    let mut claimed: Vec<Value> = Vec::new();

    for key in snapshot {
        if claimed.contains(&key) || !root.contains_key(&key) {
            continue;
        }

        let live_key = match visit(root, &key) {
            Placement::Kept => key,
            Placement::Renamed(new_key) => {
                claimed.push(new_key.clone());
                new_key
            }
            Placement::Removed => continue,
        };

        if let Some(value) = root.get_mut(&live_key) {
            descend(value, visit);
        }
    }
}

fn descend<F>(value: &mut Value, visit: &mut F)
where
    F: FnMut(&mut Mapping, &Value) -> Placement,
{
    match value {
        Value::Mapping(map) => walk(map, visit),
        Value::Sequence(items) => {
            for item in items.iter_mut() {
                if let Value::Mapping(map) = item {
                    walk(map, visit);
                }
            }
        }
        Value::Tagged(tagged) => descend(&mut tagged.value, visit),
        _ => {}
    }
}

/// Returns true for values that hold no nested entries.
pub fn is_scalar(value: &Value) -> bool {
    match value {
        Value::Mapping(_) | Value::Sequence(_) => false,
        Value::Tagged(tagged) => is_scalar(&tagged.value),
        _ => true,
    }
}

/// Replace `old_key` with `new_key`, keeping the entry's position.
///
/// An existing entry under `new_key` is dropped first so the moved value
/// wins. Returns false when `old_key` is not present.
pub fn rename_in_place(map: &mut Mapping, old_key: &Value, new_key: Value) -> bool {
    if !map.contains_key(old_key) {
        return false;
    }
    if &new_key != old_key {
        map.shift_remove(&new_key);
    }
    let entries = std::mem::take(map);
    *map = entries
        .into_iter()
        .map(|(k, v)| {
            if &k == old_key {
                (new_key.clone(), v)
            } else {
                (k, v)
            }
        })
        .collect();
    true
}
