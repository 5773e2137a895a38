//! Property-based tests for target resolution.
//!
//! Documents are generated from a small key alphabet where some keys carry
//! a `-prod` or `-dev` suffix, so that every run mixes matching variants,
//! foreign variants, plain siblings and allow-listed scalars.

#[cfg(test)]
mod proptest_tests {
    use crate::target::{resolve, ResolverOptions, SuffixedKey};
    use crate::tree::is_scalar;
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value};

    fn key_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => "[a-z]{1,4}",
            4 => "[a-z]{1,4}-(prod|dev)",
            1 => Just("replicas-prod".to_string()),
            1 => Just("replicas-dev".to_string()),
        ]
    }

    fn value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,4}".prop_map(Value::from),
            Just(Value::Null),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec((key_strategy(), inner.clone()), 0..4).prop_map(|entries| {
                    Value::Mapping(
                        entries
                            .into_iter()
                            .map(|(k, v)| (Value::from(k), v))
                            .collect(),
                    )
                }),
                prop::collection::vec(inner, 0..3).prop_map(Value::Sequence),
            ]
        })
    }

    fn document_strategy() -> impl Strategy<Value = Mapping> {
        prop::collection::vec((key_strategy(), value_strategy()), 0..6).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (Value::from(k), v))
                .collect()
        })
    }

    fn resolved(mut doc: Mapping, target: &str) -> Mapping {
        resolve(&mut doc, target, &ResolverOptions::default());
        doc
    }

    /// Collect every (key, value) pair reachable from `map`.
    fn entries<'a>(map: &'a Mapping, out: &mut Vec<(&'a str, &'a Value)>) {
        for (key, value) in map {
            if let Some(name) = key.as_str() {
                out.push((name, value));
            }
            collect_nested(value, out);
        }
    }

    fn collect_nested<'a>(value: &'a Value, out: &mut Vec<(&'a str, &'a Value)>) {
        match value {
            Value::Mapping(map) => entries(map, out),
            Value::Sequence(items) => items.iter().for_each(|item| collect_nested(item, out)),
            _ => {}
        }
    }

    proptest! {
        /// Property: only plain scalars outside the allow-list keep a suffix
        #[test]
        fn resolve_leaves_no_collection_variants(doc in document_strategy(), target in "(prod|dev|qa)") {
            let result = resolved(doc, &target);
            let mut found = Vec::new();
            entries(&result, &mut found);
            for (name, value) in found {
                if SuffixedKey::parse(name).is_some() {
                    prop_assert!(is_scalar(value), "collection variant '{}' survived", name);
                    prop_assert_ne!(SuffixedKey::leading_segment(name), "replicas");
                }
            }
        }

        /// Property: resolving an already resolved document changes nothing
        #[test]
        fn resolve_is_idempotent(doc in document_strategy(), target in "(prod|dev)") {
            let once = resolved(doc, &target);
            let twice = resolved(once.clone(), &target);
            prop_assert_eq!(once, twice);
        }

        /// Property: unsuffixed top-level keys are never dropped
        #[test]
        fn resolve_keeps_plain_root_keys(doc in document_strategy(), target in "(prod|dev|qa)") {
            let plain: Vec<Value> = doc
                .keys()
                .filter(|k| k.as_str().is_some_and(|s| SuffixedKey::parse(s).is_none()))
                .cloned()
                .collect();
            let result = resolved(doc, &target);
            for key in plain {
                prop_assert!(result.contains_key(&key), "plain key {:?} was dropped", key);
            }
        }

        /// Property: a matching collection variant lands under its base name
        #[test]
        fn resolve_promotes_matching_variants(doc in document_strategy()) {
            let promoted: Vec<String> = doc
                .iter()
                .filter(|(_, v)| !is_scalar(v))
                .filter_map(|(k, _)| k.as_str().and_then(SuffixedKey::parse))
                .filter(|key| key.target == "prod")
                .map(|key| key.base.to_string())
                .collect();
            let result = resolved(doc, "prod");
            for base in promoted {
                prop_assert!(result.contains_key(base.as_str()), "variant for '{}' missing", base);
            }
        }
    }
}
