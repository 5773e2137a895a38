//! Target-conditional node resolution
//!
//! Manifests carry per-target variants of a node by suffixing its key with
//! the target name, e.g. `resources-prod` and `resources-staging`. Resolving
//! a document against a target keeps the matching variant under its plain
//! name (`resources`) and drops the variants of every other target.
//!
//! Only mapping and sequence values take part by default. Scalar values are
//! left alone unless the key's first segment is one of the allowed
//! low-level keys (`replicas` out of the box), so that `replicas-prod: 3`
//! resolves while `name-suffix: foo` stays a plain key.

use serde_yaml::{Mapping, Value};

use crate::tree::{self, Placement};

/// Separator between a key's base name and its target suffix.
pub const SEPARATOR: char = '-';

/// Low-level keys allowed to carry a target suffix on a scalar value.
pub const DEFAULT_SCALAR_KEYS: &[&str] = &["replicas"];

/// A mapping key parsed as `<base>-<target>`.
///
/// Splits on the last separator, so `max-surge-prod` is base `max-surge`
/// for target `prod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixedKey<'a> {
    pub base: &'a str,
    pub target: &'a str,
}

impl<'a> SuffixedKey<'a> {
    /// Parse a key, returning `None` if it has no separator.
    pub fn parse(key: &'a str) -> Option<Self> {
        key.rsplit_once(SEPARATOR)
            .map(|(base, target)| Self { base, target })
    }

    /// The segment before the first separator, used for the low-level check.
    pub fn leading_segment(key: &str) -> &str {
        key.split(SEPARATOR).next().unwrap_or(key)
    }
}

/// Options controlling which nodes take part in resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Keys whose scalar values may still carry a target suffix
    pub scalar_keys: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            scalar_keys: DEFAULT_SCALAR_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ResolverOptions {
    /// Whether a scalar-valued entry under `key` may be resolved.
    pub fn allows_scalar(&self, key: &str) -> bool {
        key.contains(SEPARATOR)
            && self
                .scalar_keys
                .iter()
                .any(|allowed| allowed == SuffixedKey::leading_segment(key))
    }
}

/// Resolve every suffixed key in `root` against `target`, in place.
///
/// Matching variants are renamed to their base name at the same position,
/// replacing any unsuffixed sibling of that name. Variants for other
/// targets are removed.
pub fn resolve(root: &mut Mapping, target: &str, options: &ResolverOptions) {
    tree::walk(root, &mut |parent, key| resolve_entry(parent, key, target, options));
}

fn resolve_entry(
    parent: &mut Mapping,
    key: &Value,
    target: &str,
    options: &ResolverOptions,
) -> Placement {
    let Some(name) = key.as_str() else {
        return Placement::Kept;
    };
    let Some(value) = parent.get(key) else {
        return Placement::Kept;
    };

    // suffixes on plain scalars are not supported outside the allow-list
    if tree::is_scalar(value) && !options.allows_scalar(name) {
        return Placement::Kept;
    }

    let Some(suffixed) = SuffixedKey::parse(name) else {
        return Placement::Kept;
    };

    if suffixed.target == target {
        let base = Value::from(suffixed.base);
        tree::rename_in_place(parent, key, base.clone());
        Placement::Renamed(base)
    } else {
        parent.shift_remove(key);
        Placement::Removed
    }
}
