//! Core types for the QBYTE coherence platform

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::PlatformConfig;
pub use error::{Error, Result};
pub use types::{CcceState, Crsm6, JobRecord, OrganismState, OrganismStatus};
