//! GPG integration for decrypting credential files.
//!
//! The engine runs the local `gpg` binary and relies on whatever keyring and
//! agent configuration is ambient for the current user. No key selection is
//! done here.

use crate::config::DEFAULT_GPG_PROGRAM;
use crate::error::{DecryptionError, EngineError, ExportError, Result};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use zeroize::{Zeroize, Zeroizing};

/// Turns ciphertext bytes into plaintext bytes.
pub trait DecryptionEngine {
    fn decrypt(&self, ciphertext: &[u8]) -> std::result::Result<Vec<u8>, EngineError>;
}

impl<F> DecryptionEngine for F
where
    F: Fn(&[u8]) -> std::result::Result<Vec<u8>, EngineError>,
{
    fn decrypt(&self, ciphertext: &[u8]) -> std::result::Result<Vec<u8>, EngineError> {
        self(ciphertext)
    }
}

/// Decryption engine backed by the `gpg` command.
#[derive(Debug, Clone)]
pub struct GpgEngine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Default for GpgEngine {
    fn default() -> Self {
        Self::new(DEFAULT_GPG_PROGRAM)
    }
}

impl GpgEngine {
    /// Create an engine running `program --batch --quiet --decrypt`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: ["--batch", "--quiet", "--decrypt"]
                .into_iter()
                .map(OsString::from)
                .collect(),
        }
    }

    /// Replace the arguments passed to the program.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check if the program is available on the system.
    pub fn check_available(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                ExportError::Other(format!(
                    "GPG not found ({}): {e}. Please install GPG.",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            return Err(ExportError::Other(format!(
                "{} --version failed",
                self.program.display()
            )));
        }

        Ok(())
    }
}

impl DecryptionEngine for GpgEngine {
    fn decrypt(&self, ciphertext: &[u8]) -> std::result::Result<Vec<u8>, EngineError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(EngineError::Spawn)?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Io(io::Error::other("engine stdin unavailable")))?;

        // Feed stdin from a second thread so a large plaintext cannot fill
        // the stdout pipe while we are still writing.
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(ciphertext));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("engine stdin writer panicked")));
            (written, output)
        });

        let mut output = output.map_err(EngineError::Io)?;

        if !output.status.success() {
            output.stdout.zeroize();
            return Err(EngineError::Failed {
                status: output.status,
                diagnostic: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if let Err(e) = written {
            output.stdout.zeroize();
            return Err(EngineError::Io(e));
        }

        Ok(output.stdout)
    }
}

/// Reads credential files and decrypts them with a single engine instance.
pub struct Decryptor<E> {
    engine: E,
}

impl<E: DecryptionEngine> Decryptor<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Decrypt a credential file into UTF-8 text.
    pub fn decrypt(&self, path: &Path) -> std::result::Result<Zeroizing<String>, DecryptionError> {
        let ciphertext = fs::read(path).map_err(|source| DecryptionError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let plaintext = self
            .engine
            .decrypt(&ciphertext)
            .map_err(|source| DecryptionError::Engine {
                path: path.to_path_buf(),
                source,
            })?;

        match String::from_utf8(plaintext) {
            Ok(text) => Ok(Zeroizing::new(text)),
            Err(err) => {
                let source = err.utf8_error();
                err.into_bytes().zeroize();
                Err(DecryptionError::InvalidEncoding {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn identity(ciphertext: &[u8]) -> std::result::Result<Vec<u8>, EngineError> {
        Ok(ciphertext.to_vec())
    }

    #[test]
    fn test_decryptor_returns_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bank.gpg");
        fs::write(&path, "login: alice\npassword: secret").unwrap();

        let decryptor = Decryptor::new(identity);
        let text = decryptor.decrypt(&path).unwrap();
        assert_eq!(text.as_str(), "login: alice\npassword: secret");
    }

    #[test]
    fn test_decryptor_invalid_encoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.gpg");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let decryptor = Decryptor::new(identity);
        match decryptor.decrypt(&path) {
            Err(DecryptionError::InvalidEncoding { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("Expected InvalidEncoding, got {other:?}"),
        }
    }

    #[test]
    fn test_decryptor_missing_file() {
        let dir = TempDir::new().unwrap();
        let decryptor = Decryptor::new(identity);
        let result = decryptor.decrypt(&dir.path().join("missing.gpg"));
        assert!(matches!(result, Err(DecryptionError::Read { .. })));
    }

    #[test]
    fn test_decryptor_engine_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.gpg");
        fs::write(&path, b"garbage").unwrap();

        let decryptor = Decryptor::new(|_: &[u8]| -> std::result::Result<Vec<u8>, EngineError> {
            Err(EngineError::Io(io::Error::other("no secret key")))
        });
        let err = decryptor.decrypt(&path).unwrap_err();
        assert_eq!(err.path(), path.as_path());
        assert!(err.to_string().contains("corrupt.gpg"));
    }

    #[cfg(unix)]
    #[test]
    fn test_gpg_engine_pipes_stdin_to_stdout() {
        let engine = GpgEngine::new("cat").with_args(Vec::<OsString>::new());
        let plaintext = engine.decrypt(b"user: x\npass: y").unwrap();
        assert_eq!(plaintext, b"user: x\npass: y");
    }

    #[cfg(unix)]
    #[test]
    fn test_gpg_engine_large_payload() {
        let engine = GpgEngine::new("cat").with_args(Vec::<OsString>::new());
        let payload = vec![b'a'; 1 << 20];
        assert_eq!(engine.decrypt(&payload).unwrap().len(), payload.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_gpg_engine_reports_diagnostic() {
        let engine = GpgEngine::new("sh").with_args([
            "-c",
            "cat >/dev/null; echo 'gpg: decryption failed: No secret key' >&2; exit 2",
        ]);
        match engine.decrypt(b"ciphertext") {
            Err(EngineError::Failed { diagnostic, status }) => {
                assert_eq!(diagnostic, "gpg: decryption failed: No secret key");
                assert_eq!(status.code(), Some(2));
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_gpg_engine_missing_program() {
        let engine = GpgEngine::new("pass-export-no-such-gpg");
        assert!(matches!(engine.decrypt(b"x"), Err(EngineError::Spawn(_))));
        assert!(engine.check_available().is_err());
    }
}
