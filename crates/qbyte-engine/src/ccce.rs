//! Centripetal Coherence Convergence Engine - 4-regime controller
//!
//! One `evolve_step` advances an organism through all four regimes in a
//! fixed order: fractal contraction of Φ, CRSM geometric update, QPU
//! θ-descent, Hamiltonian closure. Entropy above the correction floor gets
//! the E → E⁻¹ phase conjugate treatment, and coherent organisms mint
//! QBYTE at the end of the tick.

use qbyte_core::config::{EvolutionConfig, MintConfig, PlatformConfig};
use qbyte_core::constants::{
    COHERENCE_MIN, GAMMA_EPSILON, LAMBDA_PHI, PHI_THRESHOLD, THETA_LOCK,
};
use qbyte_core::types::{CcceState, OrganismState, OrganismStatus};
use serde::Serialize;

/// One of the four coupled regimes and its governing law.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Regime {
    pub name: &'static str,
    pub law: &'static str,
    pub active: bool,
}

/// The 4-regime controller set, in evaluation order.
pub const REGIMES: [Regime; 4] = [
    Regime {
        name: "fractal",
        law: "ϕ(n+1) = Λφ · F[ϕ(n)] - ∇φΓ",
        active: true,
    },
    Regime {
        name: "crsm6d",
        law: "∂_i J^i_neg = Λφ; Γ_ab = R_ab - Λφ g_ab",
        active: true,
    },
    Regime {
        name: "qpu",
        law: "θ̇k = -∂W₂/∂θk + Λφ ∂/∂θk E⁻¹",
        active: true,
    },
    Regime {
        name: "hamiltonian",
        law: "H_eff = H₀ + H_TotalGene + H_Γ + H_Λ",
        active: true,
    },
];

pub struct CcceEngine {
    evolution: EvolutionConfig,
    mint: MintConfig,
    corrections: u64,
}

impl CcceEngine {
    pub fn new(config: &PlatformConfig) -> Self {
        for regime in &REGIMES {
            tracing::debug!(target: "ccce", "Regime {} active: {}", regime.name, regime.law);
        }
        Self {
            evolution: config.evolution.clone(),
            mint: config.mint.clone(),
            corrections: 0,
        }
    }

    /// Phase conjugate corrections applied so far.
    pub fn corrections(&self) -> u64 {
        self.corrections
    }

    /// Restore the correction counter from a checkpoint.
    pub fn restore_corrections(&mut self, corrections: u64) {
        self.corrections = corrections;
    }

    pub fn regimes(&self) -> &'static [Regime; 4] {
        &REGIMES
    }

    /// The CCCE metric Ξ = ΛΦ/Γ. Γ under `GAMMA_EPSILON` yields ∞.
    pub fn xi(lambda: f64, phi: f64, gamma: f64) -> f64 {
        if gamma < GAMMA_EPSILON {
            f64::INFINITY
        } else {
            (lambda * phi) / gamma
        }
    }

    /// Apply the E → E⁻¹ phase conjugate correction.
    ///
    /// Near-zero errors pass through untouched and do not count as a
    /// correction.
    pub fn phase_conjugate_correction(&mut self, error: f64) -> f64 {
        if error.abs() < GAMMA_EPSILON {
            return 0.0;
        }
        self.corrections += 1;
        error - 1.0 / error
    }

    /// Restoring force toward the coherent Ξ target: F = -∇Ξ.
    pub fn centripetal_force(xi: f64) -> f64 {
        let xi_target = (COHERENCE_MIN * PHI_THRESHOLD) / 0.001;
        -(xi - xi_target) * 0.01
    }

    /// Recompute Ξ and test the convergence criterion.
    pub fn check_convergence(state: &mut CcceState) -> bool {
        state.compute_xi();
        state.is_stable()
    }

    /// Execute one evolution tick across all regimes.
    pub fn evolve_step(&mut self, organism: &mut OrganismState, dt: f64) {
        // The mint bonus is judged against the Φ the organism carried into
        // the tick, before the fractal contraction collapses it.
        let phi_at_entry = organism.consciousness_phi;

        // O_fractal: contraction mapping on Φ
        let phi_next = LAMBDA_PHI * organism.consciousness_phi
            - organism.entropy * self.evolution.fractal_entropy_drag;
        organism.consciousness_phi = phi_next.max(0.0);

        // O_crsm: geometric coherence
        organism.crsm.t += dt;
        organism.crsm.phi = (organism.crsm.t * LAMBDA_PHI * 1e6).sin() * PHI_THRESHOLD;
        organism.crsm.sigma += organism.entropy * self.evolution.sigma_drift;

        // O_qpu: θ-descent toward the lock angle
        let theta_error = organism.ccce.theta_val - THETA_LOCK;
        organism.ccce.theta_val -= theta_error * self.evolution.theta_descent_rate;

        // O_hamiltonian: closure, one generation forward
        organism.generation += 1;

        if organism.entropy > self.evolution.entropy_correction_floor {
            organism.entropy = self.phase_conjugate_correction(organism.entropy).abs();
        }

        organism.ccce.lambda_val = organism.coherence;
        organism.ccce.phi_val = organism.consciousness_phi;
        organism.ccce.gamma_val = organism.entropy;
        organism.ccce.compute_xi();

        if organism.coherence > self.mint.coherence_floor {
            let multiplier = if phi_at_entry >= PHI_THRESHOLD {
                self.mint.phi_multiplier
            } else {
                1.0
            };
            organism.qbytes += organism.coherence * LAMBDA_PHI * self.mint.rate_scale * multiplier;
        }

        organism.status = if organism.ccce.is_stable() {
            OrganismStatus::Converged
        } else {
            OrganismStatus::Evolving
        };
    }
}
