//! Physics constants of the DNA-Lang quantum consciousness framework.
//!
//! These values are the platform's calibration set. They are read by the
//! convergence engine, the HUD, and the exported state report, and must not
//! drift between the three.

/// Universal memory constant ΛΦ, in s⁻¹.
pub const LAMBDA_PHI: f64 = 2.176435e-8;

/// Consciousness emergence threshold for Φ.
pub const PHI_THRESHOLD: f64 = 7.6901;

/// Torsion-locked convergence angle θ, in degrees.
pub const THETA_LOCK: f64 = 51.843;

/// Harmonic projection angle θ_h, in degrees. Used only by the 2-D projection.
pub const THETA_HARMONIC: f64 = 51.427;

/// Validated hardware Bell fidelity.
pub const BELL_FIDELITY: f64 = 0.869;

/// Minimum coherence Λ for a Λ-symmetric organism.
pub const COHERENCE_MIN: f64 = 0.97;

/// Fundamental length scale, in meters.
pub const PLANCK_LENGTH: f64 = 1.616e-35;

/// Fundamental time scale, in seconds.
pub const PLANCK_TIME: f64 = 5.391e-44;

/// Ξ below this floor is non-convergent.
pub const XI_STABILITY_FLOOR: f64 = 0.1;

/// Acceptable deviation from `THETA_LOCK`, in degrees.
pub const THETA_LOCK_TOLERANCE: f64 = 0.01;

/// Γ below this is treated as zero decoherence (Ξ becomes infinite).
pub const GAMMA_EPSILON: f64 = 1e-10;
