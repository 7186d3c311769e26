//! Password store layout: locating credential files and naming them.
//!
//! A store is a directory tree where every `*.gpg` file holds one entry.
//! The entry's title is its path relative to the store root with the
//! extension removed, so `~/.password-store/email/work.gpg` is `email/work`.

use crate::config::CREDENTIAL_EXTENSION;
use crate::error::{ExportError, Result};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Check if a path carries the credential extension.
pub fn is_credential_file(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(CREDENTIAL_EXTENSION))
}

/// Anything but a directory counts, dangling symlinks included, so that a
/// broken entry fails the export instead of vanishing from it. Symlinks to
/// directories are treated as directories.
fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    !file_type.is_dir() && !(file_type.is_symlink() && entry.path().is_dir())
}

/// Recursively collect every credential file below `root`.
///
/// Symlinked directories are not descended into. The first traversal error,
/// including a permission error on a nested directory, aborts the crawl.
/// The result is in traversal order; callers sort it.
pub fn crawl(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| ExportError::StoreUnavailable {
            path: root.to_path_buf(),
            source,
        })?;

        if is_file_entry(&entry) && is_credential_file(entry.path()) {
            found.push(entry.into_path());
        }
    }

    debug!(count = found.len(), root = %root.display(), "crawled password store");
    Ok(found)
}

/// Derive the display title of a credential file.
///
/// The longest common component prefix of `root` and `path` is dropped along
/// with any leading separator, then the credential extension if present.
/// `path` is expected to lie below `root`; otherwise the result is still
/// deterministic but not meaningful.
///
/// Titles are UTF-8. Bytes of a non-UTF-8 file name are replaced with
/// U+FFFD, so such names can share a title; the store is expected to use
/// UTF-8 names as `pass` itself does.
pub fn title(path: &Path, root: &Path) -> String {
    let shared = root
        .components()
        .zip(path.components())
        .take_while(|(a, b)| a == b)
        .count();

    let mut remainder: PathBuf = path
        .components()
        .skip(shared)
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();

    if is_credential_file(&remainder) {
        remainder.set_extension("");
    }

    remainder.to_string_lossy().into_owned()
}
