//! Platform root layout.
//!
//! Everything the platform touches lives under one root directory. The
//! subdirectory set is the v2 workspace schema; `version.rs` owns getting
//! older roots into this shape.

use std::path::{Path, PathBuf};

/// Subdirectories of a v2 platform root.
pub const SUBDIRS: [&str; 6] = ["logs", "config", "organisms", "workloads", "sdk", "output"];

#[derive(Debug, Clone)]
pub struct PlatformPaths {
    root: PathBuf,
}

impl PlatformPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn organisms(&self) -> PathBuf {
        self.root.join("organisms")
    }

    pub fn workloads(&self) -> PathBuf {
        self.root.join("workloads")
    }

    pub fn sdk(&self) -> PathBuf {
        self.root.join("sdk")
    }

    pub fn output(&self) -> PathBuf {
        self.root.join("output")
    }

    /// Platform config file inside the root.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("platform.toml")
    }

    /// Workspace schema manifest.
    pub fn manifest(&self) -> PathBuf {
        self.root.join(".version.json")
    }

    /// Ecosystem checkpoint (v2 location).
    pub fn checkpoint(&self) -> PathBuf {
        self.output().join("ecosystem.json")
    }

    /// Exported state report (v2 location).
    pub fn state_report(&self) -> PathBuf {
        self.output().join("platform_state.json")
    }

    /// Create the root and every subdirectory.
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in SUBDIRS {
            std::fs::create_dir_all(self.root.join(dir))?;
        }
        Ok(())
    }
}
