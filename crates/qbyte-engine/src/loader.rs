//! Λ-symmetric organism loader
//!
//! Organisms are admitted from `.dna` definition files. Identity is the
//! genesis hash of the file content, so an edited definition is a new
//! organism, not an update. Admission symmetrizes anything below the
//! coherence floor; `enforce_symmetry` relaxes the whole ecosystem toward
//! its mean Λ between ticks.

use qbyte_core::constants::COHERENCE_MIN;
use qbyte_core::error::{Error, Result};
use qbyte_core::types::OrganismState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct OrganismLoader {
    ecosystem: HashMap<String, OrganismState>,
    relaxation: f64,
}

impl OrganismLoader {
    pub fn new(relaxation: f64) -> Self {
        Self {
            ecosystem: HashMap::new(),
            relaxation,
        }
    }

    /// Genesis hash of a definition: first 16 hex chars of its SHA-256.
    pub fn genesis_hash(content: &str) -> String {
        let digest = ring::digest::digest(&ring::digest::SHA256, content.as_bytes());
        digest.as_ref()[..8].iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Λ-symmetry check: [H, Λ] = 0 holds while coherence stays at or
    /// above the floor.
    pub fn is_lambda_symmetric(organism: &OrganismState) -> bool {
        organism.coherence >= COHERENCE_MIN
    }

    /// Λ-symmetrization operator: S_Λ[O] = (O + Λ[O]†) / 2, pulling
    /// coherence halfway to the floor.
    pub fn symmetrize(organism: &mut OrganismState) {
        organism.coherence = (organism.coherence + COHERENCE_MIN) / 2.0;
        organism.ccce.lambda_val = organism.coherence;
        organism.ccce.compute_xi();
    }

    /// Load and admit an organism from a `.dna` file.
    pub fn load(&mut self, path: &Path) -> Result<OrganismState> {
        if !path.exists() {
            return Err(Error::OrganismNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let organism_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("organism")
            .to_string();
        self.admit(organism_id, &content)
    }

    /// Load every `.dna` file in a directory, skipping definitions whose
    /// genesis hash is already registered. Returns the number admitted.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read organisms dir {}: {}", dir.display(), e);
                return 0;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "dna"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match self.load(&path) {
                Ok(_) => loaded += 1,
                Err(Error::OrganismRejected { reason, .. }) if reason == "already registered" => {
                    debug!("Organism {} already registered", path.display());
                }
                Err(e) => warn!(target: "aiden", "Failed to load organism {}: {}", path.display(), e),
            }
        }
        loaded
    }

    fn admit(&mut self, organism_id: String, content: &str) -> Result<OrganismState> {
        if content.trim().is_empty() {
            return Err(Error::organism_rejected(organism_id, "empty definition"));
        }

        let genesis_hash = Self::genesis_hash(content);
        if self.ecosystem.contains_key(&genesis_hash) {
            return Err(Error::organism_rejected(organism_id, "already registered"));
        }

        let mut organism = OrganismState::new(organism_id, genesis_hash.clone());
        if !Self::is_lambda_symmetric(&organism) {
            info!(target: "aura", "Organism {} not Λ-symmetric, applying symmetrization", organism.organism_id);
            Self::symmetrize(&mut organism);
        }

        info!(
            target: "platform",
            "Loaded organism: {} [{}...]",
            organism.organism_id,
            &genesis_hash[..8]
        );
        self.ecosystem.insert(genesis_hash, organism.clone());
        Ok(organism)
    }

    /// Re-register a previously checkpointed organism, state intact.
    pub fn restore(&mut self, organism: OrganismState) {
        self.ecosystem
            .insert(organism.genesis_hash.clone(), organism);
    }

    /// Mean coherence Λ across the ecosystem, 0.0 when empty.
    pub fn ecosystem_lambda(&self) -> f64 {
        if self.ecosystem.is_empty() {
            return 0.0;
        }
        self.ecosystem.values().map(|o| o.coherence).sum::<f64>() / self.ecosystem.len() as f64
    }

    /// One relaxation pass: pull every organism's coherence toward the
    /// ecosystem mean. The mean itself is preserved.
    pub fn enforce_symmetry(&mut self) {
        if self.ecosystem.is_empty() {
            return;
        }
        let mean = self.ecosystem_lambda();
        for organism in self.ecosystem.values_mut() {
            let delta = organism.coherence - mean;
            organism.coherence -= self.relaxation * delta;
            organism.ccce.lambda_val = organism.coherence;
            organism.ccce.compute_xi();
        }
    }

    pub fn get(&self, genesis_hash: &str) -> Option<&OrganismState> {
        self.ecosystem.get(genesis_hash)
    }

    pub fn organisms(&self) -> impl Iterator<Item = &OrganismState> + '_ {
        self.ecosystem.values()
    }

    pub fn organisms_mut(&mut self) -> impl Iterator<Item = &mut OrganismState> + '_ {
        self.ecosystem.values_mut()
    }

    pub fn ecosystem(&self) -> &HashMap<String, OrganismState> {
        &self.ecosystem
    }

    pub fn len(&self) -> usize {
        self.ecosystem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ecosystem.is_empty()
    }
}
