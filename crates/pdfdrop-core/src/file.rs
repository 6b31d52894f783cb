//! Files staged for submission

use serde::Serialize;

/// A user-chosen file.
///
/// `P` is the raw-bytes handle: a browser `File` in the wasm binding,
/// the file contents natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile<P> {
    pub name: String,
    pub size: u64,
    /// Declared MIME type; empty when the source did not report one
    pub mime: String,
    pub payload: P,
}

impl<P> SelectedFile<P> {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>, payload: P) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
            payload,
        }
    }

    /// Lowercased extension including the dot (".pdf"), if any
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

impl SelectedFile<Vec<u8>> {
    /// Build an in-memory file; size is taken from the bytes
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, size, mime, bytes)
    }
}

/// Row handed to a UI surface for rendering the file list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// Positional identifier, valid until the next mutation
    pub index: usize,
    pub name: String,
    pub size: u64,
}

pub(crate) fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
