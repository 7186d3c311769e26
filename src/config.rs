//! Fixed names and defaults for a GNU pass store.

use crate::error::{ExportError, Result};
use std::path::PathBuf;

/// Extension marking an encrypted credential file (compared case-sensitively).
pub const CREDENTIAL_EXTENSION: &str = "gpg";

/// The only branch whose tip is used for the version stamp.
pub const PRIMARY_BRANCH: &str = "master";

/// First line of every dump.
pub const DOCUMENT_HEADER: &str = "# GNU pass dump";

/// Prefix applied to every plaintext line.
pub const INDENT: &str = "    ";

/// Store directory name below the home directory.
const DEFAULT_STORE_DIR: &str = ".password-store";

/// Default decryption engine program.
pub const DEFAULT_GPG_PROGRAM: &str = "gpg";

/// Resolve `~/.password-store`.
pub fn default_store_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_STORE_DIR))
        .ok_or_else(|| {
            ExportError::Other(
                "Cannot determine home directory. Use --store or PASSWORD_STORE_DIR.".to_string(),
            )
        })
}
