//! Error types for the QBYTE platform

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("organism not found: {0}")]
    OrganismNotFound(String),

    #[error("organism rejected: {id} - {reason}")]
    OrganismRejected { id: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("workspace schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn organism_rejected(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OrganismRejected {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }
}
