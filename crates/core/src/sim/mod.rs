//! Program loading.

/// Assembly parser and file loader.
pub mod loader;
