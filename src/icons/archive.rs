//! Pull-based extraction of an icon package tarball into a snapshot

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_compression::futures::bufread::GzipDecoder;
use async_tar::Archive;
use futures::StreamExt;
use futures::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::icons::error::FetchError;
use crate::icons::types::{IconMeta, IconSetSnapshot};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// `d` attribute of the first `<path>` element
static SVG_PATH_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<path\b[^>]*?\bd\s*=\s*"([^"]*)""#).expect("valid svg path regex")
});

#[derive(Debug, PartialEq, Eq)]
enum EntryKind {
    Svg(String),
    PackageJson,
    Meta,
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    version: Option<String>,
}

/// Decode a gzip or plain tar stream into a snapshot.
///
/// The snapshot is only produced once the whole stream has been read and the
/// archive contained a `meta.json`. `requested_version` is used when the
/// archive has no `package.json` version.
pub async fn extract_snapshot<R>(
    reader: R,
    requested_version: &str,
) -> Result<IconSetSnapshot, FetchError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut reader = BufReader::new(reader);
    let is_gzip = reader.fill_buf().await?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        debug!("Decoding gzip-compressed archive");
        read_entries(GzipDecoder::new(reader), requested_version).await
    } else {
        read_entries(reader, requested_version).await
    }
}

async fn read_entries<R>(reader: R, requested_version: &str) -> Result<IconSetSnapshot, FetchError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut entries = Archive::new(reader).entries()?;

    let mut paths = IndexMap::new();
    let mut meta: Option<Vec<IconMeta>> = None;
    let mut package_version: Option<String> = None;

    while let Some(entry) = entries.next().await {
        let mut entry = entry?;
        let entry_path = PathBuf::from(entry.path()?.as_os_str());
        let Some(kind) = classify(&entry_path) else {
            continue;
        };

        let mut content = Vec::new();
        entry.read_to_end(&mut content).await?;

        match kind {
            EntryKind::Svg(name) => {
                let path_data = extract_path_data(&String::from_utf8_lossy(&content));
                paths.insert(name, path_data);
            }
            EntryKind::PackageJson => {
                let package: PackageJson = serde_json::from_slice(&content).map_err(|e| {
                    FetchError::MalformedArchive(format!("{}: {}", entry_path.display(), e))
                })?;
                package_version = package.version;
            }
            EntryKind::Meta => {
                let records: Vec<IconMeta> = serde_json::from_slice(&content).map_err(|e| {
                    FetchError::MalformedArchive(format!("{}: {}", entry_path.display(), e))
                })?;
                meta = Some(records);
            }
        }
    }

    let meta = meta.ok_or_else(|| FetchError::MalformedArchive("meta.json not found".into()))?;

    let version = package_version.unwrap_or_else(|| {
        warn!(
            "Archive has no package.json version, using {}",
            requested_version
        );
        requested_version.to_string()
    });

    debug!(
        "Extracted {} icon records and {} paths for {}",
        meta.len(),
        paths.len(),
        version
    );

    Ok(IconSetSnapshot {
        version,
        meta,
        paths,
    })
}

/// Decide what an archive entry contributes, if anything.
///
/// `package.json` and `meta.json` count only at the package root
/// (`package/meta.json`), so nested copies are ignored. Icons are read from
/// the package's `svg/` directory only.
fn classify(path: &Path) -> Option<EntryKind> {
    let file_name = path.file_name()?.to_str()?;
    let depth = path.components().count();

    match file_name {
        "package.json" if depth <= 2 => return Some(EntryKind::PackageJson),
        "meta.json" if depth <= 2 => return Some(EntryKind::Meta),
        _ => {}
    }

    let in_svg_dir = path.parent()?.file_name()? == "svg" && depth <= 3;
    if in_svg_dir && path.extension()? == "svg" {
        let stem = path.file_stem()?.to_str()?;
        return Some(EntryKind::Svg(stem.to_string()));
    }

    None
}

fn extract_path_data(svg: &str) -> String {
    SVG_PATH_DATA
        .captures(svg)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
