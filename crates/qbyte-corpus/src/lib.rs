//! Quantum workload archive scanner
//!
//! Workload archives are directories of job metadata: each job leaves a
//! `*-info.json` and, once finished, a sibling `*-result.json`. The scanner
//! tallies them into `CorpusStats` for the HUD and the state report. No
//! circuits run here; this is bookkeeping over files on disk.

mod scanner;

pub use scanner::{CorpusScanner, CorpusStats};
