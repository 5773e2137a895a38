//! Phase 3: Determining File Order
//!
//! This is the third phase of a unification run. Its responsibility is to
//! flatten the file-level dependency graph into a single emission order in
//! which every file follows all of the files it depends on.
//!
//! ## Process
//!
//! 1.  **Normalization**: Self-dependencies are ignored, and files that are
//!     only ever named as dependencies become nodes without edges of their
//!     own.
//!
//! 2.  **Layered Flattening**: Each round takes every file whose
//!     dependencies have all been emitted, sorts that layer by name, and
//!     appends it to the order. Ties between independent files are
//!     therefore broken alphabetically, which keeps the output stable.
//!
//! 3.  **Cycle Detection**: If files remain but no file is ready, the
//!     remaining files contain a cycle. One concrete cycle is reported in
//!     the error and the run stops before anything is written.

use std::collections::{BTreeMap, BTreeSet};

use super::{DependencyGraph, FileOrder};
use crate::error::{Error, Result};

/// Execute Phase 3: flatten the dependency graph into an emission order
pub fn execute(graph: &DependencyGraph) -> Result<FileOrder> {
    let mut remaining: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (file, dependencies) in graph {
        let entry = remaining.entry(file.as_str()).or_default();
        for dependency in dependencies {
            if dependency != file {
                entry.insert(dependency.as_str());
            }
        }
        for dependency in dependencies {
            remaining.entry(dependency.as_str()).or_default();
        }
    }

    let mut order = Vec::with_capacity(remaining.len());
    loop {
        let ready: BTreeSet<&str> = remaining
            .iter()
            .filter(|(_, dependencies)| dependencies.is_empty())
            .map(|(file, _)| *file)
            .collect();
        if ready.is_empty() {
            break;
        }

        remaining.retain(|file, _| !ready.contains(file));
        for dependencies in remaining.values_mut() {
            dependencies.retain(|dependency| !ready.contains(dependency));
        }
        order.extend(ready.into_iter().map(str::to_string));
    }

    if !remaining.is_empty() {
        return Err(Error::GraphCycle {
            cycle: describe_cycle(&remaining),
        });
    }

    Ok(FileOrder::new(order))
}

/// Find one cycle among files that could not be ordered.
///
/// Every remaining file still has a remaining dependency, so following the
/// first dependency from any file must eventually revisit a file.
fn describe_cycle(remaining: &BTreeMap<&str, BTreeSet<&str>>) -> String {
    let Some(start) = remaining.keys().next().copied() else {
        return String::new();
    };

    let mut path = vec![start];
    let mut current = start;
    while let Some(next) = remaining
        .get(current)
        .and_then(|dependencies| dependencies.iter().next().copied())
    {
        if let Some(position) = path.iter().position(|file| *file == next) {
            let mut cycle = path[position..].to_vec();
            cycle.push(next);
            return cycle.join(" -> ");
        }
        path.push(next);
        current = next;
    }

    path.join(" -> ")
}
