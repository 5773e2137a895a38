//! # kondunite
//!
//! This library unifies a directory of Kubernetes manifests into a single
//! document for one deployment target. It is used by the `kondunite`
//! command-line tool but can be driven directly, for example from a build
//! script that renders one manifest per environment.
//!
//! ## Quick Example
//!
//! ```
//! use kondunite::target::{resolve, ResolverOptions};
//!
//! let mut document: serde_yaml::Mapping = serde_yaml::from_str(
//!     "replicas-prod: 3\nreplicas-dev: 1\nresources-prod:\n  cpu: 2\n",
//! )
//! .unwrap();
//!
//! resolve(&mut document, "prod", &ResolverOptions::default());
//!
//! assert_eq!(document.get("replicas"), Some(&serde_yaml::Value::from(3)));
//! assert!(document.contains_key("resources"));
//! assert!(!document.contains_key("replicas-dev"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Conditional nodes (`target`)**: a key written `<base>-<target>` is
//!   kept as `<base>` when unifying for `<target>` and dropped otherwise.
//!   Scalar values only take part for allowed low-level keys such as
//!   `replicas`.
//! - **Images (`images`)**: every `image` field can have its tag replaced,
//!   and all images are collected for the replicated `images:` section.
//! - **Document metadata**: `targetsOnly`, `dependencies` and `replKind`
//!   keys steer loading and are stripped from the output.
//! - **Phases (`phases`)**: discovery, loading, ordering, composition and
//!   writing, coordinated by `phases::orchestrator`.
//!
//! ## Execution Flow
//!
//! 1.  **Discovery**: Find `*.yaml` files under the manifest directory.
//! 2.  **Loading**: Split files into documents, filter and resolve them.
//! 3.  **Ordering**: Order files so dependencies come first.
//! 4.  **Composition**: Concatenate the documents, optionally behind the
//!     replicated base and images section.
//! 5.  **Disk Output**: Write the unified document.

pub mod config;
pub mod error;
pub mod images;
pub mod output;
pub mod phases;
pub mod target;
pub mod tree;
pub mod unquote;

#[cfg(test)]
mod target_proptest;
