//! Integration tests for qbyte-core
//!
//! Validates the state types and config surface the rest of the platform
//! builds on: CRSM projections, Ξ computation and stability, organism
//! defaults, job record parsing, and TOML config loading.

use qbyte_core::config::PlatformConfig;
use qbyte_core::constants::{COHERENCE_MIN, LAMBDA_PHI, PHI_THRESHOLD, THETA_LOCK};
use qbyte_core::error::Error;
use qbyte_core::types::{CcceState, Crsm6, JobRecord, OrganismState, OrganismStatus};

// ============================================================
// Crsm6 — vector operations and projections
// ============================================================

#[test]
fn crsm_array_preserves_axis_order() {
    let v = Crsm6 {
        x: 1.0,
        y: 2.0,
        z: 3.0,
        t: 4.0,
        phi: 5.0,
        sigma: 6.0,
    };
    assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn crsm_magnitude_of_zero_vector_is_zero() {
    assert_eq!(Crsm6::default().magnitude(), 0.0);
}

#[test]
fn crsm_magnitude_is_euclidean() {
    let v = Crsm6 {
        x: 3.0,
        y: 4.0,
        ..Crsm6::default()
    };
    assert!((v.magnitude() - 5.0).abs() < 1e-12);
}

#[test]
fn crsm_projections_of_zero_vector_are_zero() {
    let v = Crsm6::default();
    assert_eq!(v.project_2d(), (0.0, 0.0));
    assert_eq!(v.project_3d(), (0.0, 0.0, 0.0));
}

#[test]
fn crsm_2d_projection_passes_z_and_sigma_through() {
    // z contributes 1:1 to the first component, σ 1:1 to the second.
    let v = Crsm6 {
        z: 2.5,
        sigma: -1.5,
        ..Crsm6::default()
    };
    let (x, y) = v.project_2d();
    assert!((x - 2.5).abs() < 1e-12);
    assert!((y + 1.5).abs() < 1e-12);
}

#[test]
fn crsm_3d_projection_preserves_spatial_xy() {
    let v = Crsm6 {
        x: 7.0,
        y: -3.0,
        t: 1.0,
        phi: 2.0,
        ..Crsm6::default()
    };
    let (x, y, _z) = v.project_3d();
    assert_eq!(x, 7.0);
    assert_eq!(y, -3.0);
}

#[test]
fn crsm_3d_projection_mixes_through_lock_angle() {
    let theta = THETA_LOCK.to_radians();
    let v = Crsm6 {
        z: 1.0,
        t: 1.0,
        ..Crsm6::default()
    };
    let (_, _, z) = v.project_3d();
    assert!((z - (theta.cos() + theta.sin())).abs() < 1e-12);
}

// ============================================================
// CcceState — Ξ = ΛΦ/Γ and stability
// ============================================================

#[test]
fn xi_from_default_state() {
    // (0.97 × 7.6901) / 0.001 = 7459.397
    let mut state = CcceState::default();
    let xi = state.compute_xi();
    assert!((xi - 7459.397).abs() < 1e-6);
    assert_eq!(state.xi_val, xi);
}

#[test]
fn xi_is_infinite_when_gamma_vanishes() {
    let mut state = CcceState {
        gamma_val: 0.0,
        ..CcceState::default()
    };
    assert!(state.compute_xi().is_infinite());
}

#[test]
fn default_state_is_stable_after_xi_refresh() {
    let mut state = CcceState::default();
    assert!(!state.is_stable(), "Ξ is 0.0 until computed");
    state.compute_xi();
    assert!(state.is_stable());
}

#[test]
fn theta_outside_lock_window_is_unstable() {
    let mut state = CcceState {
        theta_val: THETA_LOCK + 0.02,
        ..CcceState::default()
    };
    state.compute_xi();
    assert!(!state.is_stable());
}

#[test]
fn xi_below_floor_is_unstable() {
    let mut state = CcceState {
        phi_val: 1e-6,
        gamma_val: 0.5,
        ..CcceState::default()
    };
    state.compute_xi();
    assert!(!state.is_stable());
}

// ============================================================
// OrganismState — defaults and serialization
// ============================================================

#[test]
fn organism_new_starts_initializing() {
    let organism = OrganismState::new("genesis", "0011223344556677");
    assert_eq!(organism.organism_id, "genesis");
    assert_eq!(organism.genesis_hash, "0011223344556677");
    assert_eq!(organism.generation, 0);
    assert_eq!(organism.coherence, COHERENCE_MIN);
    assert_eq!(organism.entropy, 0.03);
    assert_eq!(organism.consciousness_phi, PHI_THRESHOLD);
    assert_eq!(organism.qbytes, 0.0);
    assert_eq!(organism.status, OrganismStatus::Initializing);
}

#[test]
fn organism_status_serializes_uppercase() {
    let json = serde_json::to_string(&OrganismStatus::Evolving).unwrap();
    assert_eq!(json, "\"EVOLVING\"");
    let back: OrganismStatus = serde_json::from_str("\"CONVERGED\"").unwrap();
    assert_eq!(back, OrganismStatus::Converged);
}

#[test]
fn organism_roundtrips_through_json() {
    let mut organism = OrganismState::new("alpha", "aabbccddeeff0011");
    organism.generation = 12;
    organism.qbytes = 4.25;
    organism.status = OrganismStatus::Evolving;

    let json = serde_json::to_string(&organism).unwrap();
    let back: OrganismState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, organism);
}

#[test]
fn organism_deserializes_with_missing_fields() {
    // Older checkpoints may lack newer fields. serde(default) fills them.
    let back: OrganismState =
        serde_json::from_str(r#"{"organism_id":"old","genesis_hash":"ff00"}"#).unwrap();
    assert_eq!(back.organism_id, "old");
    assert_eq!(back.coherence, COHERENCE_MIN);
    assert_eq!(back.status, OrganismStatus::Initializing);
}

// ============================================================
// JobRecord — info file parsing defaults
// ============================================================

#[test]
fn job_record_defaults_unknown_fields() {
    let job: JobRecord = serde_json::from_str("{}").unwrap();
    assert_eq!(job.job_id, "unknown");
    assert_eq!(job.backend, "unknown");
    assert_eq!(job.status, "unknown");
    assert_eq!(job.cost, 0);
    assert!(!job.success);
}

#[test]
fn job_record_reads_info_fields() {
    let job: JobRecord = serde_json::from_str(
        r#"{"id":"job-42","backend":"ibm_brisbane","status":"COMPLETED","created":"2026-01-01T00:00:00Z","cost":600}"#,
    )
    .unwrap();
    assert_eq!(job.job_id, "job-42");
    assert_eq!(job.backend, "ibm_brisbane");
    assert_eq!(job.cost, 600);
}

// ============================================================
// PlatformConfig — TOML loading
// ============================================================

#[test]
fn config_defaults_match_platform_calibration() {
    let config = PlatformConfig::default();
    assert_eq!(config.evolution.dt, 0.1);
    assert_eq!(config.evolution.iterations, 20);
    assert_eq!(config.mint.coherence_floor, 0.9);
    assert_eq!(config.mint.phi_multiplier, 1.5);
    assert_eq!(config.mint.rate_scale, 1e7);
    assert_eq!(config.corpus.sample_limit, 50);
    assert_eq!(config.watch.poll_ms, 500);
}

#[test]
fn config_partial_toml_fills_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("platform.toml");
    std::fs::write(&path, "[mint]\nphi_multiplier = 2.0\n").unwrap();

    let config = PlatformConfig::load(&path);
    assert_eq!(config.mint.phi_multiplier, 2.0);
    assert_eq!(config.mint.coherence_floor, 0.9);
    assert_eq!(config.evolution.iterations, 20);
}

#[test]
fn config_missing_file_falls_back_to_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config = PlatformConfig::load(&tmp.path().join("nope.toml"));
    assert_eq!(config.evolution.dt, 0.1);
}

#[test]
fn config_load_strict_errors_on_missing_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = PlatformConfig::load_strict(&tmp.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn config_toml_roundtrip() {
    let config = PlatformConfig::default();
    let toml_text = config.to_toml();
    let back: PlatformConfig = toml::from_str(&toml_text).unwrap();
    assert_eq!(back.evolution.dt, config.evolution.dt);
    assert_eq!(back.mint.rate_scale, config.mint.rate_scale);
    assert_eq!(back.corpus.info_suffix, config.corpus.info_suffix);
}

#[test]
fn mint_example_from_the_whitepaper() {
    // One tick at Λ = 0.97 with the Φ bonus active:
    // 0.97 × 2.176435e-8 × 1e7 × 1.5 ≈ 0.3167 QBYTE.
    let config = PlatformConfig::default();
    let minted = 0.97 * LAMBDA_PHI * config.mint.rate_scale * config.mint.phi_multiplier;
    assert!((minted - 0.3167).abs() < 1e-4);
}
