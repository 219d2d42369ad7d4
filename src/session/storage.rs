//! Durable storage for the bearer token

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConsoleError, Result};

/// Single-key store that outlives the process
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    /// Removing a token that is not there is not an error.
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Token persisted as `{"token": "..."}` in a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConsoleError::StorageLoad {
                    path: self.display_path(),
                    source: e,
                })
            }
        };

        let file: SessionFile =
            serde_json::from_str(&content).map_err(|e| ConsoleError::StorageParse {
                path: self.display_path(),
                source: e,
            })?;

        if file.token.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(file.token))
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        let save_err = |e: std::io::Error| ConsoleError::StorageSave {
            path: self.display_path(),
            source: e,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(save_err)?;
        }

        let content = serde_json::to_string_pretty(&SessionFile {
            token: token.to_string(),
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        match std::fs::remove_file(&temp_path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(save_err(e)),
            _ => {}
        }

        // The token is a credential: owner-only on unix
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .mode(0o600)
                .open(&temp_path)
                .map_err(save_err)?;
            file.write_all(content.as_bytes()).map_err(save_err)?;
        }

        #[cfg(not(unix))]
        std::fs::write(&temp_path, content).map_err(save_err)?;

        std::fs::rename(&temp_path, &self.path).map_err(save_err)?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConsoleError::StorageSave {
                path: self.display_path(),
                source: e,
            }),
        }
    }
}

/// Process-local storage for sessions that must not touch the disk
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}
