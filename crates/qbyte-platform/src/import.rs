//! Corpus import
//!
//! Copies an uploads directory into the platform root by file class:
//! organism definitions into `organisms/`, scripts and notes into `sdk/`.

use crate::paths::PlatformPaths;
use globset::{Glob, GlobSet, GlobSetBuilder};
use qbyte_core::error::{Error, Result};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportCounts {
    pub organisms: usize,
    pub scripts: usize,
    pub notes: usize,
}

fn glob_set(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(|e| Error::config(e.to_string()))?);
    }
    builder.build().map_err(|e| Error::config(e.to_string()))
}

/// Import every matching file from `uploads` into the platform root.
pub fn import_uploads(uploads: &Path, paths: &PlatformPaths) -> Result<ImportCounts> {
    let organisms = glob_set(&["*.dna"])?;
    let scripts = glob_set(&["*.py", "*.sh"])?;
    let notes = glob_set(&["*.txt"])?;

    info!(target: "platform", "Importing uploaded corpus from {}", uploads.display());

    let mut counts = ImportCounts::default();
    for entry in std::fs::read_dir(uploads)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if organisms.is_match(name) {
            std::fs::copy(&path, paths.organisms().join(name))?;
            info!(target: "aura", "Imported organism: {}", name);
            counts.organisms += 1;
        } else if scripts.is_match(name) {
            std::fs::copy(&path, paths.sdk().join(name))?;
            info!(target: "aiden", "Imported script: {}", name);
            counts.scripts += 1;
        } else if notes.is_match(name) {
            std::fs::copy(&path, paths.sdk().join(name))?;
            counts.notes += 1;
        }
    }

    info!(
        target: "platform",
        "Import complete: {} organisms, {} scripts, {} notes",
        counts.organisms,
        counts.scripts,
        counts.notes
    );
    Ok(counts)
}
