//! Container image collection and tag rewriting
//!
//! Every `image` field in a manifest is a reference of the form
//! `name[:tag]`. The collector rewrites the tag of any image named in the
//! override map and records the final reference, so a replicated release
//! can list every image the unified manifest pulls.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;
use serde_yaml::{Mapping, Value};

use crate::tree::{self, Placement};

/// Key under which manifests declare a container image.
pub const IMAGE_KEY: &str = "image";

/// Tag reported for references that carry none.
pub const DEFAULT_TAG: &str = "latest";

/// Registry source reported for images outside every configured registry.
pub const PUBLIC_SOURCE: &str = "public";

/// A container image reference, split at the first `:`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageRef {
    pub name: String,
    pub tag: Option<String>,
}

impl ImageRef {
    pub fn parse(reference: &str) -> Self {
        match reference.split_once(':') {
            Some((name, tag)) => Self {
                name: name.to_string(),
                tag: Some(tag.to_string()),
            },
            None => Self {
                name: reference.to_string(),
                tag: None,
            },
        }
    }

    /// The tag, or `latest` when the reference has none.
    pub fn tag_or_default(&self) -> &str {
        self.tag.as_deref().unwrap_or(DEFAULT_TAG)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{}:{}", self.name, tag),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Image name to replacement tag.
pub type TagOverrides = BTreeMap<String, String>;

/// Rewrite overridden tags in `root` and return every image it references.
pub fn collect_and_rewrite(root: &mut Mapping, overrides: &TagOverrides) -> BTreeSet<ImageRef> {
    let mut collected = BTreeSet::new();

    tree::walk(root, &mut |parent, key| {
        if key.as_str() != Some(IMAGE_KEY) {
            return Placement::Kept;
        }
        let Some(reference) = parent.get(key).and_then(Value::as_str) else {
            debug!("Skipping non-string image value");
            return Placement::Kept;
        };

        let mut image = ImageRef::parse(reference);
        if let Some(tag) = overrides.get(&image.name) {
            image.tag = Some(tag.clone());
            parent.insert(key.clone(), Value::from(image.to_string()));
        }
        collected.insert(image);
        Placement::Kept
    });

    collected
}

/// A registry configured in the replicated vendor settings.
///
/// Written as `endpoint/source`, e.g. `gcr.io/acme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    pub endpoint: String,
    pub source: String,
}

impl Registry {
    /// Prefix an image name must carry to belong to this registry.
    pub fn prefix(&self) -> String {
        format!("{}/{}", self.endpoint, self.source)
    }

    /// The image's name within this registry, if it belongs to it.
    pub fn strip<'a>(&self, image_name: &'a str) -> Option<&'a str> {
        image_name
            .strip_prefix(&self.prefix())?
            .strip_prefix('/')
            .filter(|name| !name.is_empty())
    }
}

/// One entry of the replicated `images:` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicatedImage {
    pub name: String,
    pub source: String,
    pub tag: String,
}

impl ReplicatedImage {
    /// Resolve an image against the first registry it belongs to.
    pub fn resolve(image: &ImageRef, registries: &[Registry]) -> Self {
        let (name, source) = registries
            .iter()
            .find_map(|registry| {
                registry
                    .strip(&image.name)
                    .map(|name| (name.to_string(), registry.source.clone()))
            })
            .unwrap_or_else(|| (image.name.clone(), PUBLIC_SOURCE.to_string()));

        Self {
            name,
            source,
            tag: image.tag_or_default().to_string(),
        }
    }
}

/// Render the `images:` section appended after the replicated base.
pub fn build_images_section(images: &BTreeSet<ImageRef>, registries: &[Registry]) -> String {
    let mut section = String::from("\nimages:\n");
    for image in images {
        let entry = ReplicatedImage::resolve(image, registries);
        section.push_str(&format!(
            "\n  - name: {}\n    source: {}\n    tag: \"{}\"\n",
            entry.name, entry.source, entry.tag
        ));
    }
    section
}
