//! pass-export: plaintext dump of a GNU pass password store.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod gpg;
pub mod store;
pub mod utils;
pub mod version;

// Re-export commonly used types
pub use error::{DecryptionError, EngineError, ExportError, Result};
pub use export::{ExportOptions, ExportSummary, Exporter};
pub use gpg::{DecryptionEngine, Decryptor, GpgEngine};
pub use version::{CommitInfo, CommitSource, GitCli, VersionStamp};
