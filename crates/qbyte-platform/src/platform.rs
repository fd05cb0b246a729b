//! Platform orchestration
//!
//! Owns the live state (loader, engine, corpus stats) behind one lock and
//! drives it through the run phases: import, corpus scan, organism load,
//! evolution, export. Watch mode keeps the same state alive and feeds it
//! watcher events; evolution passes are gated by a one-permit semaphore so
//! a slow pass is skipped over, never queued behind.

use crate::checkpoint;
use crate::import::{self, ImportCounts};
use crate::paths::PlatformPaths;
use crate::report::{self, PlatformReport};
use crate::version::{VersionController, SCHEMA_VERSION};
use crate::watcher::{WatchEvent, WorkloadWatcher};
use crate::hud;
use qbyte_core::config::{EvolutionConfig, PlatformConfig};
use qbyte_core::error::Error;
use qbyte_corpus::{CorpusScanner, CorpusStats};
use qbyte_engine::{CcceEngine, OrganismLoader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex, Semaphore};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Initializing,
    Evolved,
    Watching,
}

impl RunMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Initializing => "INITIALIZING",
            RunMode::Evolved => "EVOLVED",
            RunMode::Watching => "WATCHING",
        }
    }
}

pub struct PlatformState {
    pub loader: OrganismLoader,
    pub engine: CcceEngine,
    pub corpus: CorpusStats,
    pub mode: RunMode,
}

pub struct Platform {
    paths: PlatformPaths,
    config: PlatformConfig,
    state: Arc<Mutex<PlatformState>>,
    evolve_gate: Arc<Semaphore>,
    run_id: String,
    started: Instant,
}

impl Platform {
    /// Open a platform root: schema check, layout, checkpoint hydration.
    pub fn open(root: PathBuf, config: PlatformConfig) -> anyhow::Result<Self> {
        let paths = PlatformPaths::new(root);
        VersionController::new(paths.clone()).ensure_version(SCHEMA_VERSION)?;
        paths.ensure()?;

        let mut loader = OrganismLoader::new(config.evolution.symmetry_relaxation);
        let mut engine = CcceEngine::new(&config);
        if let Some(snapshot) = checkpoint::hydrate(&paths.checkpoint()) {
            engine.restore_corrections(snapshot.corrections);
            for organism in snapshot.organisms.into_values() {
                loader.restore(organism);
            }
        }

        Ok(Self {
            paths,
            config,
            state: Arc::new(Mutex::new(PlatformState {
                loader,
                engine,
                corpus: CorpusStats::default(),
                mode: RunMode::Initializing,
            })),
            evolve_gate: Arc::new(Semaphore::new(1)),
            run_id: uuid::Uuid::new_v4().to_string(),
            started: Instant::now(),
        })
    }

    pub fn paths(&self) -> &PlatformPaths {
        &self.paths
    }

    /// Copy an uploads directory into the platform root.
    pub fn import(&self, uploads: &Path) -> anyhow::Result<ImportCounts> {
        Ok(import::import_uploads(uploads, &self.paths)?)
    }

    /// Scan the workload archives and store the tallies.
    pub async fn scan_corpus(&self) {
        info!(target: "ccce", "Analyzing quantum corpus...");
        let scanner = CorpusScanner::new(self.config.corpus.clone());
        let stats = scanner.scan(&self.paths.workloads());

        info!(target: "ccce", "Total jobs: {}", stats.total_jobs);
        info!(target: "ccce", "Completed: {}", stats.completed_jobs);
        info!(target: "ccce", "Success rate: {:.1}%", stats.success_rate * 100.0);
        info!(target: "ccce", "Total QPU cost: {}", stats.total_cost);
        for (backend, count) in &stats.backends {
            info!(target: "ccce", "  {}: {} jobs", backend, count);
        }

        self.state.lock().await.corpus = stats;
    }

    /// Admit every organism definition from `organisms/`.
    pub async fn load_organisms(&self) -> usize {
        info!(target: "platform", "Loading organisms...");
        let mut state = self.state.lock().await;
        let loaded = state.loader.load_dir(&self.paths.organisms());
        info!(target: "platform", "Loaded {} organisms ({} in ecosystem)", loaded, state.loader.len());
        loaded
    }

    pub async fn organism_count(&self) -> usize {
        self.state.lock().await.loader.len()
    }

    /// Evolve the whole ecosystem for a number of ticks.
    pub async fn evolve(&self, iterations: u32) {
        info!(target: "ccce", "Evolving ecosystem for {} iterations...", iterations);
        let mut state = self.state.lock().await;
        for _ in 0..iterations {
            Self::evolve_pass(&mut state, &self.config.evolution, &self.paths.checkpoint());
        }
        state.mode = RunMode::Evolved;

        match mean_finite_xi(&state.loader) {
            Some(xi) => info!(target: "ccce", "Evolution complete. CCCE Ξ: {:.4}", xi),
            None => info!(target: "ccce", "Evolution complete. CCCE Ξ: ∞"),
        }
    }

    /// One tick over every organism, then the symmetry pass, then a
    /// checkpoint.
    fn evolve_pass(state: &mut PlatformState, evolution: &EvolutionConfig, checkpoint_path: &Path) {
        for organism in state.loader.organisms_mut() {
            state.engine.evolve_step(organism, evolution.dt);
        }
        state.loader.enforce_symmetry();
        checkpoint::save_or_log(checkpoint_path, &state.loader, state.engine.corrections());
    }

    pub async fn report(&self) -> PlatformReport {
        let state = self.state.lock().await;
        report::build(
            &self.run_id,
            state.mode.as_str(),
            self.started.elapsed().as_secs_f64(),
            &state.loader,
            &state.engine,
            &state.corpus,
        )
    }

    /// Export the state report to `output/platform_state.json`.
    pub async fn export(&self) -> anyhow::Result<PathBuf> {
        let report = self.report().await;
        let path = self.paths.state_report();
        report::export(&path, &report)?;
        info!(target: "platform", "Platform state exported to {}", path.display());
        Ok(path)
    }

    pub async fn hud(&self) -> String {
        hud::render(&self.report().await)
    }

    /// Watch mode: respond to new organisms and archived jobs until
    /// interrupted. Every event triggers one gated evolution pass.
    pub async fn watch(&self) -> anyhow::Result<()> {
        self.state.lock().await.mode = RunMode::Watching;

        let mut watcher =
            WorkloadWatcher::new(self.paths.organisms(), self.paths.workloads(), &self.config);
        watcher.prime();
        tokio::time::sleep(Duration::from_secs(self.config.watch.settle_secs)).await;

        let (tx, mut rx) = mpsc::channel::<WatchEvent>(100);
        tokio::spawn(watcher.run(tx));
        info!(target: "platform", "Watch mode active");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!(target: "platform", "Interrupt received, shutting down");
                    break;
                }
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event).await;
                    self.spawn_evolve_pass();
                }
            }
        }

        {
            let state = self.state.lock().await;
            checkpoint::save_or_log(
                &self.paths.checkpoint(),
                &state.loader,
                state.engine.corrections(),
            );
        }
        self.export().await?;
        Ok(())
    }

    async fn handle_event(&self, event: WatchEvent) {
        match event {
            WatchEvent::OrganismAdded(path) | WatchEvent::OrganismGrown(path) => {
                let mut state = self.state.lock().await;
                match state.loader.load(&path) {
                    Ok(organism) => info!(
                        target: "aura",
                        "Organism {} joined the ecosystem [{}...]",
                        organism.organism_id,
                        &organism.genesis_hash[..8]
                    ),
                    Err(Error::OrganismRejected { reason, .. })
                        if reason == "already registered" =>
                    {
                        debug!("Organism {} unchanged", path.display());
                    }
                    Err(e) => {
                        warn!(target: "aiden", "Failed to load organism {}: {}", path.display(), e);
                    }
                }
            }
            WatchEvent::JobArchived(path) => {
                debug!("Job archived: {}", path.display());
                self.scan_corpus().await;
            }
        }
    }

    /// Kick off one evolution pass unless one is already running.
    fn spawn_evolve_pass(&self) {
        let permit = match self.evolve_gate.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                info!(target: "ccce", "Evolution pass already running, skipping");
                return;
            }
        };

        let state = self.state.clone();
        let evolution = self.config.evolution.clone();
        let checkpoint_path = self.paths.checkpoint();
        let report_path = self.paths.state_report();
        let run_id = self.run_id.clone();
        let started = self.started;
        tokio::spawn(async move {
            let _permit = permit;
            let mut state = state.lock().await;
            Platform::evolve_pass(&mut state, &evolution, &checkpoint_path);

            let report = report::build(
                &run_id,
                state.mode.as_str(),
                started.elapsed().as_secs_f64(),
                &state.loader,
                &state.engine,
                &state.corpus,
            );
            if let Err(e) = report::export(&report_path, &report) {
                error!("Failed to refresh state report: {}", e);
            }
        });
    }
}

fn mean_finite_xi(loader: &OrganismLoader) -> Option<f64> {
    let xis: Vec<f64> = loader
        .organisms()
        .map(|o| o.ccce.xi_val)
        .filter(|xi| xi.is_finite())
        .collect();
    if xis.is_empty() {
        return None;
    }
    Some(xis.iter().sum::<f64>() / xis.len() as f64)
}
