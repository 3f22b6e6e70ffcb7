pub mod config;
pub mod icons;
pub mod lsp;
