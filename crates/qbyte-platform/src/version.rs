//! VersionController — non-destructive platform root migration
//!
//! Handles v1→v2 migration (flat root → subdirectory layout), rollback,
//! and forward-compat checks.

use crate::paths::PlatformPaths;
use qbyte_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Workspace schema this binary targets.
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionManifest {
    pub schema_version: u32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub upgraded_from: Option<u32>,
    #[serde(default)]
    pub upgraded_at: Option<String>,
    #[serde(default)]
    pub layout: HashMap<String, String>,
}

pub struct VersionController {
    paths: PlatformPaths,
}

impl VersionController {
    pub fn new(paths: PlatformPaths) -> Self {
        Self { paths }
    }

    fn read_manifest(&self) -> Option<VersionManifest> {
        let path = self.paths.manifest();
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn write_manifest(&self, manifest: &VersionManifest) -> Result<()> {
        let json = serde_json::to_string_pretty(manifest)?;
        let tmp = self.paths.manifest().with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, self.paths.manifest())?;
        Ok(())
    }

    /// Ensure the root is at the target schema version. Migrate if needed.
    pub fn ensure_version(&self, target: u32) -> Result<()> {
        let current = self.read_manifest();

        if let Some(ref manifest) = current {
            if manifest.status.as_deref() == Some("migrating") {
                info!("Detected incomplete migration, resuming...");
                return self.resume_migration(target);
            }

            let current_version = manifest.schema_version;

            if current_version > target {
                return Err(Error::SchemaTooNew {
                    found: current_version,
                    supported: target,
                });
            }

            if current_version == target {
                info!("Platform root already at schema version {}", target);
                return Ok(());
            }

            if current_version == 1 && target == 2 {
                return self.migrate_v1_to_v2();
            }

            return Err(Error::migration(format!(
                "no migration path from version {} to {}",
                current_version, target
            )));
        }

        // No manifest. Detect the layout.
        let has_output = self.paths.output().exists();
        if has_output {
            info!("Detected v2 layout without manifest, writing manifest");
            self.write_manifest(&self.v2_manifest(Some(1)))?;
            return Ok(());
        }

        if self.has_v1_remnants() && target == 2 {
            return self.migrate_v1_to_v2();
        }

        if target == 2 {
            info!("Fresh platform root, creating v2 layout");
            return self.create_v2_layout();
        }

        Ok(())
    }

    /// v1 roots kept organism files and the state report directly in root.
    fn has_v1_remnants(&self) -> bool {
        if self.paths.root().join("platform_state.json").exists() {
            return true;
        }
        std::fs::read_dir(self.paths.root())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .any(|e| e.path().extension().is_some_and(|ext| ext == "dna"))
            })
            .unwrap_or(false)
    }

    fn migrate_v1_to_v2(&self) -> Result<()> {
        info!("Migrating platform root v1 → v2");

        // Step 1: mark the migration in progress FIRST
        self.write_manifest(&VersionManifest {
            schema_version: 1,
            status: Some("migrating".to_string()),
            upgraded_from: None,
            upgraded_at: None,
            layout: HashMap::new(),
        })?;

        // Step 2: create the v2 subdirectories
        self.paths.ensure()?;

        // Step 3: move root organism files into organisms/
        let dna_files: Vec<PathBuf> = std::fs::read_dir(self.paths.root())?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "dna"))
            .collect();
        for path in dna_files {
            if let Some(name) = path.file_name() {
                let dest = self.paths.organisms().join(name);
                if !dest.exists() {
                    std::fs::rename(&path, &dest)?;
                    info!("Moved {} → organisms/", name.to_string_lossy());
                }
            }
        }

        // Step 4: move the root state report into output/
        let old_state = self.paths.root().join("platform_state.json");
        if old_state.exists() && !self.paths.state_report().exists() {
            std::fs::rename(&old_state, self.paths.state_report())?;
            info!("Moved platform_state.json → output/");
        }

        // Step 5: write the final manifest
        self.write_manifest(&self.v2_manifest(Some(1)))?;
        info!("Migration v1 → v2 complete");

        Ok(())
    }

    fn resume_migration(&self, target: u32) -> Result<()> {
        if target == 2 {
            // Re-run v1→v2; each step is idempotent (checks existence before acting)
            return self.migrate_v1_to_v2();
        }
        Err(Error::migration(format!(
            "cannot resume migration to version {}",
            target
        )))
    }

    fn create_v2_layout(&self) -> Result<()> {
        self.paths.ensure()?;
        self.write_manifest(&self.v2_manifest(None))
    }

    fn v2_manifest(&self, upgraded_from: Option<u32>) -> VersionManifest {
        let mut layout = HashMap::new();
        layout.insert("organisms".into(), "organism definitions".into());
        layout.insert("workloads".into(), "quantum job archives".into());
        layout.insert("sdk".into(), "imported scripts".into());
        layout.insert("output".into(), "checkpoints and reports".into());
        layout.insert("logs".into(), "channel logs".into());
        layout.insert("config".into(), "platform config".into());

        VersionManifest {
            schema_version: 2,
            status: None,
            upgraded_from,
            upgraded_at: Some(chrono::Utc::now().to_rfc3339()),
            layout,
        }
    }

    /// Rollback v2 → v1: organism files and the state report return to root.
    pub fn rollback_v2_to_v1(&self) -> Result<()> {
        info!("Rolling back platform root v2 → v1");

        if self.paths.organisms().exists() {
            let dna_files: Vec<PathBuf> = std::fs::read_dir(self.paths.organisms())?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "dna"))
                .collect();
            for path in dna_files {
                if let Some(name) = path.file_name() {
                    let dest = self.paths.root().join(name);
                    if !dest.exists() {
                        std::fs::rename(&path, &dest)?;
                    }
                }
            }
            remove_dir_if_empty(&self.paths.organisms());
        }

        let state = self.paths.state_report();
        if state.exists() {
            let dest = self.paths.root().join("platform_state.json");
            if !dest.exists() {
                std::fs::rename(&state, &dest)?;
            }
        }
        remove_dir_if_empty(&self.paths.output());

        self.write_manifest(&VersionManifest {
            schema_version: 1,
            status: None,
            upgraded_from: Some(2),
            upgraded_at: Some(chrono::Utc::now().to_rfc3339()),
            layout: HashMap::new(),
        })?;

        info!("Rollback v2 → v1 complete");
        Ok(())
    }

    /// Current schema version (0 if no manifest).
    pub fn current_version(&self) -> u32 {
        self.read_manifest().map(|m| m.schema_version).unwrap_or(0)
    }
}

fn remove_dir_if_empty(dir: &std::path::Path) {
    let is_empty = std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if is_empty {
        if let Err(e) = std::fs::remove_dir(dir) {
            warn!("Could not remove {}: {}", dir.display(), e);
        }
    }
}
