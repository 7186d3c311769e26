//! Export driver: header, version stamp, then one section per credential.

use crate::config::{DOCUMENT_HEADER, INDENT, PRIMARY_BRANCH};
use crate::error::{ExportError, Result};
use crate::gpg::{DecryptionEngine, Decryptor};
use crate::store;
use crate::version::{CommitSource, VersionStamp};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Options for a single export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Store root directory
    pub root: PathBuf,
    /// Skip entries that fail to decrypt instead of aborting
    pub best_effort: bool,
}

impl ExportOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            best_effort: false,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of sections written
    pub exported: usize,
    /// Titles omitted in best-effort mode
    pub skipped: Vec<String>,
}

impl ExportSummary {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Characters that end a line, besides `\r\n` taken as a pair.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split text into lines on every Unicode line boundary.
///
/// `\r\n` counts as one break and a trailing break does not start a new line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(LINE_BREAKS) {
        lines.push(&rest[..pos]);
        let tail = &rest[pos..];
        let width = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[width..];
    }

    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}

/// Prefix every line of `plaintext` with four spaces.
///
/// An empty line becomes four spaces. Lines are rejoined with `\n`.
pub fn indent(plaintext: &str) -> Zeroizing<String> {
    let lines = split_lines(plaintext);
    let capacity = plaintext.len() + INDENT.len() * (lines.len() + 1);

    // Sized up front so the buffer never reallocates and leaves copies behind
    let mut out = Zeroizing::new(String::with_capacity(capacity));
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(INDENT);
        out.push_str(line);
    }
    out
}

/// Render one credential section.
pub fn format_section(title: &str, plaintext: &str) -> Zeroizing<String> {
    let body = indent(plaintext);

    let mut section = Zeroizing::new(String::with_capacity(title.len() + body.len() + 8));
    section.push_str("# ");
    section.push_str(title);
    section.push_str("\n\n");
    section.push_str(&body);
    section.push_str("\n\n");
    section
}

/// Sort credential files by title, keeping crawl order among equal titles.
pub fn sort_by_title(files: Vec<PathBuf>, root: &Path) -> Vec<(String, PathBuf)> {
    let mut entries: Vec<(String, PathBuf)> = files
        .into_iter()
        .map(|path| {
            if path.to_str().is_none() {
                warn!(path = %path.display(), "credential path is not valid UTF-8");
            }
            (store::title(&path, root), path)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// Drives a full dump of one store.
pub struct Exporter<E, C> {
    decryptor: Decryptor<E>,
    history: C,
    options: ExportOptions,
}

impl<E: DecryptionEngine, C: CommitSource> Exporter<E, C> {
    pub fn new(decryptor: Decryptor<E>, history: C, options: ExportOptions) -> Self {
        Self {
            decryptor,
            history,
            options,
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Write the complete dump to `sink`.
    ///
    /// Every section is flushed as soon as it is written; on failure, output
    /// already written stays in the sink and nothing further is written.
    pub fn run<W: Write>(&self, sink: &mut W) -> Result<ExportSummary> {
        let root = &self.options.root;

        writeln!(sink, "{DOCUMENT_HEADER}")?;
        sink.flush()?;

        let stamp = VersionStamp::read(&self.history, root, PRIMARY_BRANCH)?;
        write!(sink, "{stamp}")?;
        sink.flush()?;

        let files = store::crawl(root)?;
        let entries = sort_by_title(files, root);

        let mut summary = ExportSummary::default();
        for (title, path) in entries {
            debug!(%title, "exporting entry");

            let plaintext = match self.decryptor.decrypt(&path) {
                Ok(plaintext) => plaintext,
                Err(e) if self.options.best_effort => {
                    warn!(%title, error = %e, "skipping entry");
                    summary.skipped.push(title);
                    continue;
                }
                Err(e) => return Err(ExportError::Decryption(e)),
            };

            let section = format_section(&title, &plaintext);
            sink.write_all(section.as_bytes())?;
            sink.flush()?;
            summary.exported += 1;
        }

        Ok(summary)
    }
}
