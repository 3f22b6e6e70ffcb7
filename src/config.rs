use globset::{GlobBuilder, GlobSetBuilder};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

// =============================================================================
// Time-related constants
// =============================================================================

/// Quiet period before a document is re-linted (500ms), restarted on every edit
pub const LINT_DEBOUNCE_MS: u64 = 500;

/// Timeout for registry and tarball requests in milliseconds (60 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 60_000;

// =============================================================================
// Registry constants
// =============================================================================

/// Default base URL for the npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Version string that follows the registry's `dist-tags.latest`
pub const LATEST: &str = "latest";

/// Maximum number of icons returned by a search
pub const SEARCH_RESULT_LIMIT: usize = 50;

/// LSP configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LspConfig {
    pub icons: IconsConfig,
    pub lint: LintConfig,
    pub completion: CompletionConfig,
}

impl LspConfig {
    /// Parse settings sent by the client.
    ///
    /// Accepts either the configuration object itself or an object that nests
    /// it under an `mdi` key (the usual shape of `workspace/didChangeConfiguration`).
    pub fn from_settings(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::Object(mut map) if map.contains_key("mdi") => {
                serde_json::from_value(map.remove("mdi").unwrap_or_default())
            }
            serde_json::Value::Null => Ok(Self::default()),
            other => serde_json::from_value(other),
        }
    }
}

/// Which icon set is active and which version of it
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IconsConfig {
    /// Use the light icon set instead of the regular one
    pub light: bool,
    /// Pinned version, or "latest"
    pub version: String,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            light: false,
            version: LATEST.to_string(),
        }
    }
}

impl IconsConfig {
    /// Returns the pinned version, or None when following latest
    pub fn pinned_version(&self) -> Option<&str> {
        let version = self.version.trim();
        if version.is_empty() || version == LATEST {
            None
        } else {
            Some(version)
        }
    }
}

/// Diagnostics for unknown icon names
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LintConfig {
    pub enabled: bool,
    /// Full tokens (e.g. `mdi-custom`) that are never reported
    pub ignored_icons: Vec<String>,
    /// Language ids to lint; empty means every language
    pub languages: Vec<String>,
    /// Globs over workspace-relative paths of files that are never linted
    pub ignore_paths: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ignored_icons: Vec::new(),
            languages: Vec::new(),
            ignore_paths: Vec::new(),
        }
    }
}

impl LintConfig {
    pub fn applies_to(&self, language_id: &str) -> bool {
        self.enabled
            && (self.languages.is_empty() || self.languages.iter().any(|l| l == language_id))
    }

    /// Whether `relative_path` matches one of `ignore_paths`.
    ///
    /// `*` stops at `/` while `**` crosses directories. Invalid patterns are
    /// skipped.
    pub fn ignores_path(&self, relative_path: &str) -> bool {
        if self.ignore_paths.is_empty() {
            return false;
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_paths {
            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => warn!("Skipping invalid ignore path {:?}: {}", pattern, e),
            }
        }

        match builder.build() {
            Ok(set) => set.is_match(relative_path),
            Err(e) => {
                warn!("Failed to build ignore path matcher: {}", e);
                false
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionConfig {
    /// Offer aliases as additional completion labels
    pub include_aliases: bool,
}

/// Returns the path to the data directory for mdi-lsp.
/// Uses $XDG_DATA_HOME/mdi-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/mdi-lsp,
/// or ./mdi-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the root directory for persisted icon snapshots.
pub fn storage_dir() -> PathBuf {
    data_dir().join("icons")
}

/// Returns the directory holding log files.
pub fn log_dir() -> PathBuf {
    data_dir()
}

/// File name prefix of the rolling log file.
pub const LOG_FILE_PREFIX: &str = "mdi-lsp.log";

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "MDI_LSP_LOG";

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("mdi-lsp")
}
