//! Vault boundary: where books are found and outputs are written.
//!
//! The batch driver only ever talks to the [`Vault`] trait, so tests can
//! swap the filesystem for anything else. Paths are vault-relative and
//! `/`-separated regardless of platform.

use std::path::{Path, PathBuf};

use crate::error::VaultError;

pub trait Vault: Send + Sync {
    /// Recursive listing of files with a case-insensitive `.epub`
    /// extension, sorted for deterministic batch order.
    fn list_epubs(&self, folder: &str) -> Result<Vec<String>, VaultError>;

    fn read_binary(&self, path: &str) -> Result<Vec<u8>, VaultError>;

    fn read_text(&self, path: &str) -> Result<String, VaultError>;

    /// Creates a new text file. Never overwrites: an existing target is
    /// `VaultError::AlreadyExists`.
    fn create_text(&self, path: &str, content: &str) -> Result<(), VaultError>;

    /// Creates a new binary file, same overwrite rule as `create_text`.
    fn create_binary(&self, path: &str, data: &[u8]) -> Result<(), VaultError>;

    /// Creates the whole folder chain, ok when it already exists.
    fn ensure_folder(&self, path: &str) -> Result<(), VaultError>;

    fn folder_exists(&self, path: &str) -> bool;
}

/// Strips characters that are unsafe in vault file names, replacing each
/// run with a single space and trimming the ends.
pub fn slug(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => ' ',
            _ => c,
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Filesystem-backed vault rooted at a directory.
pub struct DirVault {
    root: PathBuf,
}

impl DirVault {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn full_path(&self, rel: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in rel.split('/').filter(|p| !p.is_empty()) {
            path.push(part);
        }
        path
    }
}

impl Vault for DirVault {
    fn list_epubs(&self, folder: &str) -> Result<Vec<String>, VaultError> {
        let start = self.full_path(folder);
        if !start.is_dir() {
            return Err(VaultError::NotAFolder(folder.to_string()));
        }
        let mut found = Vec::new();
        let mut stack = vec![start];
        while let Some(dir) = stack.pop() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map_or(false, |e| e.eq_ignore_ascii_case("epub"))
                {
                    if let Ok(rel) = path.strip_prefix(&self.root) {
                        found.push(relative_name(rel));
                    }
                }
            }
        }
        found.sort();
        Ok(found)
    }

    fn read_binary(&self, path: &str) -> Result<Vec<u8>, VaultError> {
        let full = self.full_path(path);
        if !full.is_file() {
            return Err(VaultError::NotFound(path.to_string()));
        }
        Ok(std::fs::read(full)?)
    }

    fn read_text(&self, path: &str) -> Result<String, VaultError> {
        let full = self.full_path(path);
        if !full.is_file() {
            return Err(VaultError::NotFound(path.to_string()));
        }
        Ok(std::fs::read_to_string(full)?)
    }

    fn create_text(&self, path: &str, content: &str) -> Result<(), VaultError> {
        self.create_binary(path, content.as_bytes())
    }

    fn create_binary(&self, path: &str, data: &[u8]) -> Result<(), VaultError> {
        let full = self.full_path(path);
        if full.exists() {
            return Err(VaultError::AlreadyExists(path.to_string()));
        }
        // parents are not created implicitly; callers ensure folders first
        std::fs::write(full, data)?;
        Ok(())
    }

    fn ensure_folder(&self, path: &str) -> Result<(), VaultError> {
        std::fs::create_dir_all(self.full_path(path))?;
        Ok(())
    }

    fn folder_exists(&self, path: &str) -> bool {
        self.full_path(path).is_dir()
    }
}

fn relative_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
