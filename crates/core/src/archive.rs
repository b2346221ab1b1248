//! ZIP-backed access to the entries of an EPUB archive.

use std::io::{Cursor, Read, Seek};

use zip::ZipArchive;

use crate::error::ParseError;

/// An opened EPUB archive.
///
/// Entry reads return `Option`: a missing or unreadable entry is an
/// absence signal and callers decide whether that absence is fatal.
pub struct EpubArchive<R: Read + Seek> {
    zip: ZipArchive<R>,
}

impl EpubArchive<Cursor<Vec<u8>>> {
    /// Opens an archive held fully in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ParseError> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> EpubArchive<R> {
    /// Opens an archive from any seekable reader. Failure here is fatal:
    /// the input is not a ZIP file at all.
    pub fn from_reader(reader: R) -> Result<Self, ParseError> {
        Ok(EpubArchive {
            zip: ZipArchive::new(reader)?,
        })
    }

    /// Raw bytes of an entry, `None` when absent or unreadable.
    pub fn read_binary(&mut self, path: &str) -> Option<Vec<u8>> {
        let mut file = match self.zip.by_name(path) {
            Ok(f) => f,
            Err(zip::result::ZipError::FileNotFound) => return None,
            Err(e) => {
                tracing::warn!("Archive entry '{}' not readable: {}", path, e);
                return None;
            }
        };
        let mut data = Vec::with_capacity(file.size() as usize);
        if let Err(e) = file.read_to_end(&mut data) {
            tracing::warn!("Archive entry '{}' failed to decompress: {}", path, e);
            return None;
        }
        Some(data)
    }

    /// Entry decoded as text. Decoding is lossy, so any readable entry
    /// yields a string.
    pub fn read_text(&mut self, path: &str) -> Option<String> {
        self.read_binary(path)
            .map(|data| String::from_utf8_lossy(&data).into_owned())
    }
}
