//! Archive walk and job tallying.

use qbyte_core::config::CorpusConfig;
use qbyte_core::types::JobRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Aggregate view over every archived job under a workloads directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_jobs: u64,
    pub completed_jobs: u64,
    /// Info files present but unparseable.
    pub skipped: u64,
    pub total_cost: u64,
    pub backends: BTreeMap<String, u64>,
    pub success_rate: f64,
    /// Sample of parsed jobs, capped at the configured limit.
    pub jobs: Vec<JobRecord>,
}

#[derive(Deserialize)]
struct JobResult {
    #[serde(default)]
    shots: u64,
    #[serde(default)]
    fidelity: f64,
}

pub struct CorpusScanner {
    config: CorpusConfig,
}

impl CorpusScanner {
    pub fn new(config: CorpusConfig) -> Self {
        Self { config }
    }

    /// Scan a workloads directory: every `*-info.json` at the top level or
    /// one archive directory deep. A missing directory yields empty stats,
    /// malformed files are counted and skipped.
    pub fn scan(&self, workloads_dir: &Path) -> CorpusStats {
        let mut stats = CorpusStats::default();
        if !workloads_dir.is_dir() {
            return stats;
        }

        let walk = WalkDir::new(workloads_dir)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name();

        for entry in walk.into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(&self.config.info_suffix) else {
                continue;
            };

            let parsed = std::fs::read_to_string(entry.path())
                .ok()
                .and_then(|content| serde_json::from_str::<JobRecord>(&content).ok());
            let mut job = match parsed {
                Some(job) => job,
                None => {
                    debug!("Skipping malformed job info {}", entry.path().display());
                    stats.skipped += 1;
                    continue;
                }
            };

            let result_path = entry
                .path()
                .with_file_name(format!("{stem}{}", self.config.result_suffix));
            if result_path.is_file() {
                job.success = true;
                stats.completed_jobs += 1;
                if let Some(result) = std::fs::read_to_string(&result_path)
                    .ok()
                    .and_then(|content| serde_json::from_str::<JobResult>(&content).ok())
                {
                    job.shots = result.shots;
                    job.fidelity = result.fidelity;
                }
            }

            stats.total_jobs += 1;
            stats.total_cost += job.cost;
            *stats.backends.entry(job.backend.clone()).or_default() += 1;
            if stats.jobs.len() < self.config.sample_limit {
                stats.jobs.push(job);
            }
        }

        if stats.total_jobs > 0 {
            stats.success_rate = stats.completed_jobs as f64 / stats.total_jobs as f64;
        }
        stats
    }
}
