//! Phase 4: Output Composition
//!
//! This is the fourth phase of a unification run. It builds the unified
//! document from the fragments loaded in Phase 2, in the file order
//! calculated in Phase 3.
//!
//! ## Process
//!
//! 1.  **Collection**: The file order is walked and, for each file that
//!     produced fragments, every fragment is trimmed and appended in the
//!     order its documents appeared in the file. Files in the order that
//!     produced nothing (or were only named as dependencies) are skipped.
//!
//! 2.  **Layout**: In plain mode the fragments are joined with newlines. In
//!     replicated mode the replicated base comes first verbatim, followed by
//!     the generated `images:` section and then the fragments.

use std::collections::{BTreeMap, BTreeSet};

use super::{FileOrder, RunContext};
use crate::images::{build_images_section, ImageRef, Registry};

/// Where the composition gets its replicated prefix from.
#[derive(Debug, Clone, Copy)]
pub enum Layout<'a> {
    Plain,
    Replicated {
        base: &'a str,
        registries: &'a [Registry],
    },
}

/// Execute Phase 4: compose the unified document
pub fn execute(order: &FileOrder, context: &RunContext, layout: Layout<'_>) -> String {
    let fragments = ordered_fragments(order, &context.fragments);
    match layout {
        Layout::Plain => fragments.join("\n"),
        Layout::Replicated { base, registries } => {
            compose_replicated(base, &context.images, registries, &fragments)
        }
    }
}

/// Trimmed fragments of every file, in emission order.
pub fn ordered_fragments<'a>(
    order: &FileOrder,
    fragments: &'a BTreeMap<String, Vec<String>>,
) -> Vec<&'a str> {
    order
        .order
        .iter()
        .filter_map(|file| fragments.get(file))
        .flatten()
        .map(|fragment| fragment.trim())
        .collect()
}

fn compose_replicated(
    base: &str,
    images: &BTreeSet<ImageRef>,
    registries: &[Registry],
    fragments: &[&str],
) -> String {
    let mut output = String::from(base);
    output.push_str(&build_images_section(images, registries));
    for fragment in fragments {
        output.push('\n');
        output.push_str(fragment);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RunContext {
        let mut context = RunContext::new();
        context.add_fragment("app.yaml", "---\n# kind: scheduler-kubernetes\nkind: Deployment\n".to_string());
        context.add_fragment("app.yaml", "---\n# kind: scheduler-kubernetes\nkind: Service\n".to_string());
        context.add_fragment("config.yaml", "\n---\n# kind: config\nkind: ConfigMap\n\n".to_string());
        context.images.insert(ImageRef::parse("gcr.io/acme/server:1.0"));
        context
    }

    fn order() -> FileOrder {
        FileOrder::new(vec![
            "external.yaml".to_string(),
            "config.yaml".to_string(),
            "app.yaml".to_string(),
        ])
    }

    #[test]
    fn test_phase4_plain_follows_file_order() {
        let output = execute(&order(), &context(), Layout::Plain);
        assert_eq!(
            output,
            "---\n# kind: config\nkind: ConfigMap\n\
             ---\n# kind: scheduler-kubernetes\nkind: Deployment\n\
             ---\n# kind: scheduler-kubernetes\nkind: Service"
        );
    }

    #[test]
    fn test_phase4_plain_empty() {
        let output = execute(&FileOrder::new(vec![]), &RunContext::new(), Layout::Plain);
        assert_eq!(output, "");
    }

    #[test]
    fn test_phase4_replicated_layout() {
        let registries = vec![Registry {
            endpoint: "gcr.io".to_string(),
            source: "acme".to_string(),
        }];
        let output = execute(
            &order(),
            &context(),
            Layout::Replicated {
                base: "# kind: replicated\nreplicated_api_version: 2.9.2\n",
                registries: &registries,
            },
        );

        assert_eq!(
            output,
            "# kind: replicated\nreplicated_api_version: 2.9.2\n\
             \nimages:\n\
             \n  - name: server\n    source: acme\n    tag: \"1.0\"\n\
             \n---\n# kind: config\nkind: ConfigMap\
             \n---\n# kind: scheduler-kubernetes\nkind: Deployment\
             \n---\n# kind: scheduler-kubernetes\nkind: Service"
        );
    }

    #[test]
    fn test_ordered_fragments_skips_files_without_output() {
        let context = context();
        let fragments = ordered_fragments(
            &FileOrder::new(vec!["missing.yaml".to_string(), "config.yaml".to_string()]),
            &context.fragments,
        );
        assert_eq!(fragments, vec!["---\n# kind: config\nkind: ConfigMap"]);
    }
}
