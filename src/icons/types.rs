//! Common types shared by the registry, archive and store layers

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Published versions of an icon package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Version pointed to by `dist-tags.latest`
    pub latest: String,
    /// Published versions, newest first by semver precedence
    pub versions: Vec<VersionEntry>,
}

impl VersionInfo {
    pub fn find(&self, version: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|entry| entry.version == version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub version: String,
    pub published_at: Option<DateTime<Utc>>,
    pub download_url: String,
}

/// One record of an icon package's `meta.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub codepoint: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
}

/// Everything extracted from one package version, persisted as a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSetSnapshot {
    /// Version declared by the package's own `package.json`
    pub version: String,
    pub meta: Vec<IconMeta>,
    /// SVG path data keyed by icon name
    pub paths: IndexMap<String, String>,
}
