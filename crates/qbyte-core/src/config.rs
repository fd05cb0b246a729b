//! Platform configuration
//!
//! All tunable parameters in one place. Loaded from TOML at startup,
//! falls back to defaults if no config file exists.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level platform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Evolution tick parameters.
    pub evolution: EvolutionConfig,
    /// QBYTE minting parameters.
    pub mint: MintConfig,
    /// Workload archive scanning parameters.
    pub corpus: CorpusConfig,
    /// Watch-mode polling parameters.
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Evolutionary time step per tick.
    pub dt: f64,
    /// Ticks per one-shot run.
    pub iterations: u32,
    /// Entropy drag applied to Φ in the fractal contraction.
    pub fractal_entropy_drag: f64,
    /// σ growth per unit entropy per tick.
    pub sigma_drift: f64,
    /// Fraction of the θ error removed per tick.
    pub theta_descent_rate: f64,
    /// Entropy above this gets the E → E⁻¹ correction.
    pub entropy_correction_floor: f64,
    /// Fraction of each organism's distance to the ecosystem mean Λ
    /// removed per symmetry pass.
    pub symmetry_relaxation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    /// Coherence required to mint at all.
    pub coherence_floor: f64,
    /// Mint bonus applied while Φ is at or above the emergence threshold.
    pub phi_multiplier: f64,
    /// Scale factor on Λ·ΛΦ per tick.
    pub rate_scale: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Cap on job records retained in scan stats.
    pub sample_limit: usize,
    /// Filename suffix marking a job info file.
    pub info_suffix: String,
    /// Filename suffix marking a job result file.
    pub result_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Watcher poll interval in milliseconds.
    pub poll_ms: u64,
    /// Directory rescan happens every this many poll cycles.
    pub scan_every: u32,
    /// Delay after startup before the watcher begins emitting, in seconds.
    pub settle_secs: u64,
}

// ============================================================
// Defaults
// ============================================================

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            evolution: EvolutionConfig::default(),
            mint: MintConfig::default(),
            corpus: CorpusConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            iterations: 20,
            fractal_entropy_drag: 0.01,
            sigma_drift: 0.001,
            theta_descent_rate: 0.1,
            entropy_correction_floor: 0.1,
            symmetry_relaxation: 0.1,
        }
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            coherence_floor: 0.9,
            phi_multiplier: 1.5,
            rate_scale: 1e7,
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            sample_limit: 50,
            info_suffix: "-info.json".into(),
            result_suffix: "-result.json".into(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_ms: 500,
            scan_every: 4,
            settle_secs: 2,
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl PlatformConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {} - using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Load config from an explicitly requested path. Unlike `load`, a
    /// missing or unparseable file is an error, not a silent fallback.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
