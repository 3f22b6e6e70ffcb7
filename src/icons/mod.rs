//! Icon set acquisition and caching layer
//!
//! This module resolves icon package versions on the npm registry, downloads
//! and extracts their tarballs once, persists the result locally and serves
//! in-memory lookups to the LSP and the CLI.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ IconManager │────▶│   IconSet   │────▶│SnapshotStore│
//! │  (variant)  │     │ (per variant│     │   (disk)    │
//! └─────────────┘     │  in memory) │     └─────────────┘
//!                     └─────────────┘            ▲
//!                        │       │               │
//!                        ▼       ▼               │
//!              ┌─────────────┐ ┌─────────────┐   │
//!              │  Resolver   │ │   Fetcher   │───┘
//!              │ (versions)  │ │ (tarball)   │
//!              └─────────────┘ └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`manager`]: Picks the active variant and resolves "latest"
//! - [`icon_set`]: Per-variant cache with coalesced loads
//! - [`resolver`]: Memoized registry version list
//! - [`registry`]: Registry trait for fetching version metadata
//! - [`registries`]: npm registry implementation
//! - [`fetcher`]: Tarball download and persistence
//! - [`archive`]: Tar/gzip extraction into snapshots
//! - [`store`]: On-disk snapshot storage
//! - [`search`]: Weighted fuzzy search
//! - [`error`]: Error types for every layer
//! - [`types`]: Version metadata and snapshot types

pub mod archive;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod icon;
pub mod icon_set;
pub mod manager;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod search;
pub mod store;
pub mod types;
pub mod variant;
