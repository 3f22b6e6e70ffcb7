//! Registry implementations for fetching icon package metadata

pub mod npm;

pub use npm::NpmRegistry;
