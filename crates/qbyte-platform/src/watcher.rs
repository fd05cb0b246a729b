//! File watcher for watch mode
//!
//! Polls the organisms directory for new or grown `.dna` files and the
//! workloads directory for newly archived job info files. Growth checks run
//! every poll cycle; discovery of new files runs every `scan_every` cycles.

use qbyte_core::config::PlatformConfig;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A `.dna` file appeared in the organisms directory.
    OrganismAdded(PathBuf),
    /// A known `.dna` file gained bytes.
    OrganismGrown(PathBuf),
    /// A job info file appeared under the workloads directory.
    JobArchived(PathBuf),
}

pub struct WorkloadWatcher {
    organisms_dir: PathBuf,
    workloads_dir: PathBuf,
    /// Last known size per organism file.
    sizes: HashMap<PathBuf, u64>,
    known_jobs: HashSet<PathBuf>,
    poll_interval: Duration,
    scan_every: u32,
    info_suffix: String,
}

impl WorkloadWatcher {
    pub fn new(organisms_dir: PathBuf, workloads_dir: PathBuf, config: &PlatformConfig) -> Self {
        Self {
            organisms_dir,
            workloads_dir,
            sizes: HashMap::new(),
            known_jobs: HashSet::new(),
            poll_interval: Duration::from_millis(config.watch.poll_ms),
            scan_every: config.watch.scan_every.max(1),
            info_suffix: config.corpus.info_suffix.clone(),
        }
    }

    /// Record everything already on disk without firing events.
    pub fn prime(&mut self) {
        for path in list_dna(&self.organisms_dir) {
            let size = file_size(&path);
            self.sizes.insert(path, size);
        }
        for path in self.list_job_infos() {
            self.known_jobs.insert(path);
        }
        info!(
            "Watcher primed: {} organisms, {} archived jobs",
            self.sizes.len(),
            self.known_jobs.len()
        );
    }

    /// One poll cycle. Growth checks always run; `discover` additionally
    /// picks up files not seen before.
    pub fn poll_once(&mut self, discover: bool) -> Vec<WatchEvent> {
        let mut events = Vec::new();

        for path in list_dna(&self.organisms_dir) {
            let size = file_size(&path);
            match self.sizes.get(&path) {
                None if discover => {
                    debug!("New organism file: {}", path.display());
                    self.sizes.insert(path.clone(), size);
                    events.push(WatchEvent::OrganismAdded(path));
                }
                Some(&last) if size > last => {
                    debug!(
                        "Organism file grew {}→{} bytes: {}",
                        last,
                        size,
                        path.display()
                    );
                    self.sizes.insert(path.clone(), size);
                    events.push(WatchEvent::OrganismGrown(path));
                }
                _ => {}
            }
        }

        if discover {
            for path in self.list_job_infos() {
                if self.known_jobs.insert(path.clone()) {
                    debug!("New job archive: {}", path.display());
                    events.push(WatchEvent::JobArchived(path));
                }
            }
        }

        events
    }

    /// Run the poll loop, sending events to the channel.
    pub async fn run(mut self, tx: mpsc::Sender<WatchEvent>) {
        info!("Watcher started on {}", self.organisms_dir.display());
        let mut cycle: u32 = 0;
        loop {
            tokio::time::sleep(self.poll_interval).await;
            cycle = cycle.wrapping_add(1);
            let discover = cycle % self.scan_every == 0;

            for event in self.poll_once(discover) {
                if tx.send(event).await.is_err() {
                    info!("Watcher channel closed, shutting down");
                    return;
                }
            }
        }
    }

    /// Job info files at the top of the workloads dir or one archive deep.
    fn list_job_infos(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        let Ok(entries) = std::fs::read_dir(&self.workloads_dir) else {
            return found;
        };
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() {
                if let Ok(inner) = std::fs::read_dir(&path) {
                    for inner_entry in inner.filter_map(|e| e.ok()) {
                        self.note_info(inner_entry.path(), &mut found);
                    }
                }
            } else {
                self.note_info(path, &mut found);
            }
        }
        found
    }

    fn note_info(&self, path: PathBuf, found: &mut Vec<PathBuf>) {
        let is_info = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&self.info_suffix));
        if is_info {
            found.push(path);
        }
    }
}

fn list_dna(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "dna"))
        .collect();
    paths.sort();
    paths
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
