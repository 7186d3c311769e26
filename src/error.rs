//! Error types for pass-export.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

/// Failure reported by the decryption engine itself.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to run decryption engine: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to communicate with decryption engine: {0}")]
    Io(#[source] std::io::Error),

    #[error("decryption engine exited with {status}: {diagnostic}")]
    Failed { status: ExitStatus, diagnostic: String },
}

/// A single credential could not be turned into plaintext.
#[derive(Error, Debug)]
pub enum DecryptionError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decrypt {}: {source}", path.display())]
    Engine {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("Decrypted content of {} is not valid UTF-8: {source}", path.display())]
    InvalidEncoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl DecryptionError {
    /// Path of the credential file that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Engine { path, .. }
            | Self::InvalidEncoding { path, .. } => path,
        }
    }
}

/// Main error type for export runs.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Password store unavailable at {}: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Version info unavailable for {}: {reason}", path.display())]
    VersionInfoUnavailable { path: PathBuf, reason: String },

    #[error(transparent)]
    Decryption(#[from] DecryptionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
