//! Icon package tarball fixtures

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use indexmap::IndexMap;
use serde_json::{Value, json};

use mdi_lsp::icons::types::{IconMeta, IconSetSnapshot};

pub const ACCOUNT_PATH: &str = "M12,4A4,4 0 0,1 16,8A4,4 0 0,1 12,12A4,4 0 0,1 8,8A4,4 0 0,1 12,4Z";
pub const BELL_PATH: &str = "M21,19V20H3V19L5,17V11C5,7.9 7.03,5.17 10,4.29Z";

/// Builds npm-style package archives entry by entry
#[derive(Default)]
pub struct PackageBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.entries.push((path.to_string(), content.into()));
        self
    }

    pub fn package_json(self, version: &str) -> Self {
        let content = json!({ "name": "@mdi/svg", "version": version }).to_string();
        self.file("package/package.json", content)
    }

    pub fn meta(self, records: Value) -> Self {
        self.file("package/meta.json", records.to_string())
    }

    pub fn svg(self, name: &str, path_data: &str) -> Self {
        let content = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="mdi-{name}" viewBox="0 0 24 24"><path d="{path_data}" /></svg>"#
        );
        self.file(&format!("package/svg/{name}.svg"), content)
    }

    /// Plain tar archive
    pub async fn tar(&self) -> Vec<u8> {
        let mut builder = async_tar::Builder::new(Vec::new());
        for (path, content) in &self.entries {
            let mut header = async_tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            builder
                .append_data(&mut header, path, content.as_slice())
                .await
                .unwrap();
        }
        builder.into_inner().await.unwrap()
    }

    /// Gzip-compressed tar archive, as served by the npm registry
    pub async fn tgz(&self) -> Vec<u8> {
        gzip(&self.tar().await)
    }
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// A `meta.json` record
pub fn icon_record(name: &str, codepoint: &str, aliases: &[&str], tags: &[&str]) -> Value {
    json!({
        "id": format!("id-{name}"),
        "baseIconId": format!("id-{name}"),
        "name": name,
        "codepoint": codepoint,
        "aliases": aliases,
        "styles": [],
        "version": "1.5.54",
        "deprecated": false,
        "tags": tags,
        "author": "Google"
    })
}

/// Package with `account`, `bell` and `bell-ring`; `bell-ring` has no SVG
pub fn standard_package(version: &str) -> PackageBuilder {
    PackageBuilder::new()
        .package_json(version)
        .meta(json!([
            icon_record("account", "F0004", &["person", "user"], &["Account / User"]),
            icon_record("bell", "F009A", &["notifications"], &["Notification"]),
            icon_record("bell-ring", "F009E", &[], &[]),
        ]))
        .svg("account", ACCOUNT_PATH)
        .svg("bell", BELL_PATH)
}

/// Snapshot with one record per name and no path data
pub fn snapshot(version: &str, names: &[&str]) -> IconSetSnapshot {
    IconSetSnapshot {
        version: version.to_string(),
        meta: names
            .iter()
            .map(|name| IconMeta {
                name: name.to_string(),
                codepoint: "F0001".to_string(),
                author: "Google".to_string(),
                version: "1.5.54".to_string(),
                ..Default::default()
            })
            .collect(),
        paths: IndexMap::new(),
    }
}
