//! Icon records and the per-version icon collection

use std::collections::HashMap;

use tracing::warn;

use crate::icons::types::{IconMeta, IconSetSnapshot};

/// Tag shown for icons that carry no tags
pub const FALLBACK_TAG: &str = "Other";

/// A single icon: its metadata joined with its SVG path data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    meta: IconMeta,
    path_data: String,
}

impl Icon {
    pub fn new(meta: IconMeta, path_data: String) -> Self {
        Self { meta, path_data }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.meta.aliases
    }

    /// Name followed by all aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name()).chain(self.meta.aliases.iter().map(String::as_str))
    }

    /// Tags as stored in the package metadata
    pub fn raw_tags(&self) -> &[String] {
        &self.meta.tags
    }

    /// Tags for display; `["Other"]` when the icon has none
    pub fn tags(&self) -> Vec<&str> {
        if self.meta.tags.is_empty() {
            vec![FALLBACK_TAG]
        } else {
            self.meta.tags.iter().map(String::as_str).collect()
        }
    }

    pub fn codepoint(&self) -> &str {
        &self.meta.codepoint
    }

    pub fn author(&self) -> &str {
        &self.meta.author
    }

    /// Version in which the icon was introduced
    pub fn version(&self) -> &str {
        &self.meta.version
    }

    /// Raw SVG path description; empty when the archive had no SVG for it
    pub fn path_data(&self) -> &str {
        &self.path_data
    }
}

/// All icons of one (variant, version), with a name index
#[derive(Debug)]
pub struct IconCollection {
    version: String,
    icons: Vec<Icon>,
    by_name: HashMap<String, usize>,
}

impl IconCollection {
    /// Join metadata with path data by icon name.
    ///
    /// Icons without path data are kept with an empty path. Duplicate names
    /// keep their first record.
    pub fn from_snapshot(snapshot: IconSetSnapshot) -> Self {
        let IconSetSnapshot {
            version,
            meta,
            mut paths,
        } = snapshot;

        let mut icons = Vec::with_capacity(meta.len());
        let mut by_name = HashMap::with_capacity(meta.len());

        for record in meta {
            if by_name.contains_key(&record.name) {
                warn!("Duplicate icon {} in {}, keeping first", record.name, version);
                continue;
            }
            let path_data = paths.swap_remove(&record.name).unwrap_or_default();
            by_name.insert(record.name.clone(), icons.len());
            icons.push(Icon::new(record, path_data));
        }

        Self {
            version,
            icons,
            by_name,
        }
    }

    /// Version declared by the package the icons came from
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    /// Exact, case-sensitive lookup by name
    pub fn get(&self, name: &str) -> Option<&Icon> {
        self.by_name.get(name).map(|&index| &self.icons[index])
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
