//! Integration tests for qbyte-engine
//!
//! Exercises the loader against real files in a temp workspace and the
//! engine across multi-tick evolution runs.

use qbyte_core::config::PlatformConfig;
use qbyte_core::constants::{COHERENCE_MIN, LAMBDA_PHI};
use qbyte_core::error::Error;
use qbyte_core::types::{OrganismState, OrganismStatus};
use qbyte_engine::{CcceEngine, OrganismLoader, REGIMES};
use tempfile::TempDir;

fn loader() -> OrganismLoader {
    OrganismLoader::new(PlatformConfig::default().evolution.symmetry_relaxation)
}

// ============================================================
// genesis_hash — identity from content
// ============================================================

#[test]
fn genesis_hash_is_16_lowercase_hex() {
    let hash = OrganismLoader::genesis_hash("organism genesis {}");
    assert_eq!(hash.len(), 16);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn genesis_hash_is_deterministic_and_content_sensitive() {
    let a = OrganismLoader::genesis_hash("gene A");
    let b = OrganismLoader::genesis_hash("gene A");
    let c = OrganismLoader::genesis_hash("gene B");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// ============================================================
// load — admission from .dna files
// ============================================================

#[test]
fn load_admits_a_dna_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("helix.dna");
    std::fs::write(&path, "organism helix { coherence: high }").unwrap();

    let mut loader = loader();
    let organism = loader.load(&path).unwrap();
    assert_eq!(organism.organism_id, "helix");
    assert_eq!(organism.generation, 0);
    assert_eq!(loader.len(), 1);
    assert!(loader.get(&organism.genesis_hash).is_some());
}

#[test]
fn load_missing_file_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let mut loader = loader();
    let err = loader.load(&tmp.path().join("ghost.dna")).unwrap_err();
    assert!(matches!(err, Error::OrganismNotFound(_)));
}

#[test]
fn load_rejects_empty_definition() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("void.dna");
    std::fs::write(&path, "   \n").unwrap();

    let mut loader = loader();
    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, Error::OrganismRejected { .. }));
    assert!(loader.is_empty());
}

#[test]
fn load_rejects_duplicate_genesis() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.dna");
    let b = tmp.path().join("b.dna");
    std::fs::write(&a, "same genome").unwrap();
    std::fs::write(&b, "same genome").unwrap();

    let mut loader = loader();
    loader.load(&a).unwrap();
    let err = loader.load(&b).unwrap_err();
    assert!(matches!(err, Error::OrganismRejected { .. }));
    assert_eq!(loader.len(), 1);
}

#[test]
fn load_dir_admits_only_dna_files() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("one.dna"), "genome one").unwrap();
    std::fs::write(tmp.path().join("two.dna"), "genome two").unwrap();
    std::fs::write(tmp.path().join("notes.txt"), "not an organism").unwrap();
    std::fs::write(tmp.path().join("empty.dna"), "").unwrap();

    let mut loader = loader();
    assert_eq!(loader.load_dir(tmp.path()), 2);
    assert_eq!(loader.len(), 2);
}

#[test]
fn load_dir_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("one.dna"), "genome one").unwrap();

    let mut loader = loader();
    assert_eq!(loader.load_dir(tmp.path()), 1);
    assert_eq!(loader.load_dir(tmp.path()), 0);
    assert_eq!(loader.len(), 1);
}

#[test]
fn load_dir_on_missing_dir_loads_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut loader = loader();
    assert_eq!(loader.load_dir(&tmp.path().join("nowhere")), 0);
}

// ============================================================
// symmetrization — pulling Λ back to the floor
// ============================================================

#[test]
fn symmetrize_moves_halfway_to_the_floor() {
    let mut organism = OrganismState::new("dim", "00ff");
    organism.coherence = 0.90;
    OrganismLoader::symmetrize(&mut organism);
    assert!((organism.coherence - (0.90 + COHERENCE_MIN) / 2.0).abs() < 1e-12);
    assert_eq!(organism.ccce.lambda_val, organism.coherence);
}

#[test]
fn fresh_organism_is_lambda_symmetric() {
    let organism = OrganismState::new("fresh", "00ff");
    assert!(OrganismLoader::is_lambda_symmetric(&organism));
}

// ============================================================
// enforce_symmetry — ecosystem relaxation
// ============================================================

#[test]
fn relaxation_preserves_the_mean_and_shrinks_spread() {
    let mut loader = loader();
    for (id, coherence) in [("a", 0.99), ("b", 0.95), ("c", 0.91)] {
        let mut organism = OrganismState::new(id, id);
        organism.coherence = coherence;
        loader.restore(organism);
    }

    let mean_before = loader.ecosystem_lambda();
    let spread_before: f64 = loader
        .organisms()
        .map(|o| (o.coherence - mean_before).abs())
        .sum();

    loader.enforce_symmetry();

    let mean_after = loader.ecosystem_lambda();
    let spread_after: f64 = loader
        .organisms()
        .map(|o| (o.coherence - mean_after).abs())
        .sum();

    assert!((mean_before - mean_after).abs() < 1e-12);
    assert!(spread_after < spread_before);
}

#[test]
fn ecosystem_lambda_of_empty_ecosystem_is_zero() {
    let loader = loader();
    assert_eq!(loader.ecosystem_lambda(), 0.0);
    assert!(loader.is_empty());
}

// ============================================================
// evolution — multi-tick runs over a loaded ecosystem
// ============================================================

#[test]
fn twenty_tick_run_accrues_qbytes() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("miner.dna"), "organism miner {}").unwrap();

    let config = PlatformConfig::default();
    let mut loader = loader();
    let mut engine = CcceEngine::new(&config);
    loader.load_dir(tmp.path());

    for _ in 0..config.evolution.iterations {
        for organism in loader.organisms_mut() {
            engine.evolve_step(organism, config.evolution.dt);
        }
        loader.enforce_symmetry();
    }

    let organism = loader.organisms().next().unwrap();
    assert_eq!(organism.generation, u64::from(config.evolution.iterations));
    assert_eq!(organism.status, OrganismStatus::Evolving);

    // First tick carries the Φ bonus, the remaining 19 mint at base rate.
    let base = 0.97 * LAMBDA_PHI * 1e7;
    let expected = base * 1.5 + base * 19.0;
    assert!((organism.qbytes - expected).abs() < 1e-6);
}

#[test]
fn restored_organism_keeps_its_balance() {
    let mut organism = OrganismState::new("vault", "aa55");
    organism.qbytes = 12.5;
    organism.generation = 40;

    let mut loader = loader();
    loader.restore(organism);
    let restored = loader.get("aa55").unwrap();
    assert_eq!(restored.qbytes, 12.5);
    assert_eq!(restored.generation, 40);
}

#[test]
fn all_four_regimes_are_active() {
    assert_eq!(REGIMES.len(), 4);
    assert!(REGIMES.iter().all(|r| r.active));
    let names: Vec<&str> = REGIMES.iter().map(|r| r.name).collect();
    assert_eq!(names, ["fractal", "crsm6d", "qpu", "hamiltonian"]);
}
