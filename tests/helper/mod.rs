#![allow(dead_code)]

pub mod lsp;
pub mod package;
pub mod registry;

pub use lsp::*;
pub use package::*;
pub use registry::*;
