//! CLI command implementations

pub mod doctor;
pub mod inspect;
pub mod render;

mod summary;

use std::path::Path;

use anyhow::{Context, Result};

/// Reads an input file, naming it in the error.
pub(crate) fn read_input(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}: {}", what, path.display()))
}
