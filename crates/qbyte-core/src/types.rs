//! State types shared across the platform.
//!
//! `Crsm6` is the six-dimensional covariant resonance manifold coordinate,
//! `CcceState` the convergence engine metrics, `OrganismState` the living
//! record an organism accumulates across evolution ticks. All of them
//! round-trip through the ecosystem checkpoint and the exported report.

use crate::constants::{
    GAMMA_EPSILON, PHI_THRESHOLD, THETA_HARMONIC, THETA_LOCK, THETA_LOCK_TOLERANCE,
    XI_STABILITY_FLOOR,
};
use serde::{Deserialize, Serialize};

/// Six-dimensional covariant resonance and scalar manifold coordinate.
///
/// Axes: spatial x/y/z, evolutionary time t, internal phase φ, and
/// informational curvature σ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crsm6 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
    pub phi: f64,
    pub sigma: f64,
}

impl Crsm6 {
    /// Components in axis order [x, y, z, t, φ, σ].
    pub fn to_array(self) -> [f64; 6] {
        [self.x, self.y, self.z, self.t, self.phi, self.sigma]
    }

    /// Euclidean norm over all six axes.
    pub fn magnitude(self) -> f64 {
        self.to_array().iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Project to 2-D using the harmonic angle θ_h = 51.427°.
    pub fn project_2d(self) -> (f64, f64) {
        let theta_h = THETA_HARMONIC.to_radians();
        let x = self.x * theta_h.cos() + self.y * theta_h.sin() + self.z;
        let y = self.t * theta_h.cos() + self.phi * theta_h.sin() + self.sigma;
        (x, y)
    }

    /// Project to 3-D using the resonance angle θ_r = `THETA_LOCK`.
    pub fn project_3d(self) -> (f64, f64, f64) {
        let theta_r = THETA_LOCK.to_radians();
        let z = self.z * theta_r.cos()
            + self.t * theta_r.sin()
            + self.phi * theta_r.cos()
            + self.sigma * theta_r.sin();
        (self.x, self.y, z)
    }
}

/// Centripetal Coherence Convergence Engine metrics for one organism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CcceState {
    /// Coherence Λ, 0 to 1.
    pub lambda_val: f64,
    /// Consciousness Φ, 0 and up.
    pub phi_val: f64,
    /// Decoherence Γ, 0 and up.
    pub gamma_val: f64,
    /// CCCE metric Ξ = ΛΦ/Γ, cached by `compute_xi`.
    pub xi_val: f64,
    /// Lock angle θ, degrees.
    pub theta_val: f64,
}

impl Default for CcceState {
    fn default() -> Self {
        Self {
            lambda_val: 0.97,
            phi_val: PHI_THRESHOLD,
            gamma_val: 0.001,
            xi_val: 0.0,
            theta_val: THETA_LOCK,
        }
    }
}

impl CcceState {
    /// Recompute and cache Ξ = ΛΦ/Γ. Γ under `GAMMA_EPSILON` yields ∞.
    pub fn compute_xi(&mut self) -> f64 {
        self.xi_val = if self.gamma_val < GAMMA_EPSILON {
            f64::INFINITY
        } else {
            (self.lambda_val * self.phi_val) / self.gamma_val
        };
        self.xi_val
    }

    /// Convergence stability: Ξ above the floor and θ inside the lock window.
    pub fn is_stable(&self) -> bool {
        self.xi_val > XI_STABILITY_FLOOR
            && (self.theta_val - THETA_LOCK).abs() < THETA_LOCK_TOLERANCE
    }
}

/// Lifecycle of an organism in the ecosystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrganismStatus {
    #[default]
    Initializing,
    Evolving,
    Converged,
}

/// Living organism state. Keyed in the ecosystem by `genesis_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismState {
    pub organism_id: String,
    /// First 16 hex chars of the SHA-256 of the definition file.
    pub genesis_hash: String,
    pub generation: u64,
    pub crsm: Crsm6,
    pub ccce: CcceState,
    pub coherence: f64,
    pub entropy: f64,
    pub consciousness_phi: f64,
    pub qbytes: f64,
    pub status: OrganismStatus,
}

impl Default for OrganismState {
    fn default() -> Self {
        Self {
            organism_id: String::new(),
            genesis_hash: String::new(),
            generation: 0,
            crsm: Crsm6::default(),
            ccce: CcceState::default(),
            coherence: 0.97,
            entropy: 0.03,
            consciousness_phi: PHI_THRESHOLD,
            qbytes: 0.0,
            status: OrganismStatus::Initializing,
        }
    }
}

impl OrganismState {
    pub fn new(organism_id: impl Into<String>, genesis_hash: impl Into<String>) -> Self {
        Self {
            organism_id: organism_id.into(),
            genesis_hash: genesis_hash.into(),
            ..Self::default()
        }
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

/// One archived quantum job, parsed from a workload's `*-info.json` and the
/// optional sibling `*-result.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "id", default = "unknown")]
    pub job_id: String,
    #[serde(default = "unknown")]
    pub backend: String,
    #[serde(default = "unknown")]
    pub status: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub cost: u64,
    #[serde(default)]
    pub shots: u64,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub fidelity: f64,
}
