//! Ecosystem checkpointing
//!
//! The ecosystem persists to `output/ecosystem.json` after every evolution
//! pass, so balances and generation counts survive restarts. Writes are
//! atomic (tmp + rename); a checkpoint that fails to parse is discarded
//! with a warning rather than blocking startup.

use qbyte_core::error::Result;
use qbyte_core::types::OrganismState;
use qbyte_engine::OrganismLoader;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct EcosystemCheckpoint {
    pub version: u32,
    pub saved_at: String,
    pub corrections: u64,
    pub organisms: HashMap<String, OrganismState>,
}

/// Write the current ecosystem to disk atomically.
pub fn save(path: &Path, loader: &OrganismLoader, corrections: u64) -> Result<()> {
    let checkpoint = EcosystemCheckpoint {
        version: 2,
        saved_at: chrono::Utc::now().to_rfc3339(),
        corrections,
        organisms: loader.ecosystem().clone(),
    };
    let json = serde_json::to_string_pretty(&checkpoint)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Convenience wrapper for callers that only want the failure logged.
pub fn save_or_log(path: &Path, loader: &OrganismLoader, corrections: u64) {
    if let Err(e) = save(path, loader, corrections) {
        error!("Failed to checkpoint ecosystem: {}", e);
    }
}

/// Load a checkpoint if one exists and parses.
pub fn hydrate(path: &Path) -> Option<EcosystemCheckpoint> {
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str::<EcosystemCheckpoint>(&json) {
            Ok(checkpoint) => {
                info!(
                    "Hydrated ecosystem checkpoint: {} organisms, {} corrections",
                    checkpoint.organisms.len(),
                    checkpoint.corrections
                );
                Some(checkpoint)
            }
            Err(e) => {
                warn!("Failed to parse {}: {}, starting fresh", path.display(), e);
                None
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, starting fresh", path.display(), e);
            None
        }
    }
}
