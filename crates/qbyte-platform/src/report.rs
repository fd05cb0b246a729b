//! Platform state report
//!
//! The exported JSON snapshot of everything the platform knows: calibration
//! constants, ecosystem aggregates, corpus tallies, and one entry per
//! organism. Ξ can be infinite; JSON cannot, so infinite values serialize
//! as null and are excluded from the ecosystem mean.

use qbyte_core::constants::{
    BELL_FIDELITY, COHERENCE_MIN, LAMBDA_PHI, PHI_THRESHOLD, THETA_LOCK,
};
use qbyte_core::error::Result;
use qbyte_core::types::OrganismStatus;
use qbyte_corpus::CorpusStats;
use qbyte_engine::{CcceEngine, OrganismLoader, Regime, REGIMES};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct PlatformReport {
    pub meta: ReportMeta,
    pub physics_constants: PhysicsConstants,
    pub regimes: [Regime; 4],
    pub ecosystem: EcosystemSummary,
    pub quantum_corpus: CorpusSummary,
    pub organisms: Vec<OrganismEntry>,
}

#[derive(Debug, Serialize)]
pub struct ReportMeta {
    pub version: String,
    pub run_id: String,
    pub generated: String,
    pub uptime_seconds: f64,
    pub mode: String,
}

#[derive(Debug, Serialize)]
pub struct PhysicsConstants {
    pub lambda_phi: f64,
    pub phi_threshold: f64,
    pub theta_lock: f64,
    pub bell_fidelity: f64,
    pub coherence_min: f64,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            lambda_phi: LAMBDA_PHI,
            phi_threshold: PHI_THRESHOLD,
            theta_lock: THETA_LOCK,
            bell_fidelity: BELL_FIDELITY,
            coherence_min: COHERENCE_MIN,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EcosystemSummary {
    pub organisms_loaded: usize,
    pub ecosystem_lambda: f64,
    /// Mean Ξ over organisms with a finite Ξ; null when none have one.
    pub ccce_xi: Option<f64>,
    pub restoring_force: f64,
    pub phase_conjugate_corrections: u64,
}

#[derive(Debug, Serialize)]
pub struct CorpusSummary {
    pub jobs_analyzed: u64,
    pub completed_jobs: u64,
    pub success_rate: f64,
    pub total_cost: u64,
    pub backends: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize)]
pub struct OrganismEntry {
    pub id: String,
    pub genesis_hash: String,
    pub generation: u64,
    pub coherence: f64,
    pub consciousness_phi: f64,
    pub entropy: f64,
    pub qbytes: f64,
    pub xi: Option<f64>,
    pub theta: f64,
    pub status: OrganismStatus,
    pub crsm_6d: [f64; 6],
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Assemble the full report from the live platform state.
pub fn build(
    run_id: &str,
    mode: &str,
    uptime_seconds: f64,
    loader: &OrganismLoader,
    engine: &CcceEngine,
    corpus: &CorpusStats,
) -> PlatformReport {
    let finite_xis: Vec<f64> = loader
        .organisms()
        .filter_map(|o| finite(o.ccce.xi_val))
        .collect();
    let ccce_xi = if finite_xis.is_empty() {
        None
    } else {
        Some(finite_xis.iter().sum::<f64>() / finite_xis.len() as f64)
    };

    let mut organisms: Vec<OrganismEntry> = loader
        .organisms()
        .map(|o| OrganismEntry {
            id: o.organism_id.clone(),
            genesis_hash: o.genesis_hash.clone(),
            generation: o.generation,
            coherence: o.coherence,
            consciousness_phi: o.consciousness_phi,
            entropy: o.entropy,
            qbytes: o.qbytes,
            xi: finite(o.ccce.xi_val),
            theta: o.ccce.theta_val,
            status: o.status,
            crsm_6d: o.crsm.to_array(),
        })
        .collect();
    organisms.sort_by(|a, b| a.genesis_hash.cmp(&b.genesis_hash));

    PlatformReport {
        meta: ReportMeta {
            version: format!("{}-ΛΦ", env!("CARGO_PKG_VERSION")),
            run_id: run_id.to_string(),
            generated: chrono::Utc::now().to_rfc3339(),
            uptime_seconds,
            mode: mode.to_string(),
        },
        physics_constants: PhysicsConstants::default(),
        regimes: REGIMES,
        ecosystem: EcosystemSummary {
            organisms_loaded: loader.len(),
            ecosystem_lambda: loader.ecosystem_lambda(),
            ccce_xi,
            restoring_force: ccce_xi.map(CcceEngine::centripetal_force).unwrap_or(0.0),
            phase_conjugate_corrections: engine.corrections(),
        },
        quantum_corpus: CorpusSummary {
            jobs_analyzed: corpus.total_jobs,
            completed_jobs: corpus.completed_jobs,
            success_rate: corpus.success_rate,
            total_cost: corpus.total_cost,
            backends: corpus.backends.clone(),
        },
        organisms,
    }
}

/// Export the report atomically.
pub fn export(path: &Path, report: &PlatformReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
