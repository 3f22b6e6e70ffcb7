//! LSP (Language Server Protocol) implementation layer
//!
//! This module handles communication with editors via LSP and turns icon
//! references in documents into hovers, completions and diagnostics.
//!
//! # Modules
//!
//! - [`backend`]: Main LSP backend implementing `LanguageServer` trait
//! - [`token`]: Finds `mdi-<name>` references and their ranges
//! - [`diagnostics`]: Reports references to icons that do not exist
//! - [`code_action`]: "Search icon" commands for unknown icons
//! - [`hover`]: Markdown description of the icon under the cursor
//! - [`completion`]: Icon names for a partially typed reference
//! - [`debounce`]: Delays linting until typing pauses
//! - [`server`]: LSP server initialization and lifecycle

pub mod backend;
pub mod code_action;
pub mod completion;
pub mod debounce;
pub mod diagnostics;
pub mod hover;
pub mod server;
pub mod token;
