//! Client-side acceptance rules for dropped or picked files

use crate::file::SelectedFile;
use serde::Serialize;
use std::fmt;

/// 16 MiB, matching the service's upload limit
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Size limit plus extension/MIME allowlists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptPolicy {
    pub max_file_size: u64,
    /// Lowercase, with leading dot
    pub accepted_extensions: Vec<String>,
    pub accepted_mime_types: Vec<String>,
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            accepted_extensions: vec![".pdf".to_string()],
            accepted_mime_types: vec!["application/pdf".to_string()],
        }
    }
}

/// Why a candidate file was turned away
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    Empty,
    TooLarge { size: u64, limit: u64 },
    UnsupportedType { extension: Option<String> },
    UnsupportedMime { mime: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "file is empty"),
            RejectReason::TooLarge { size, limit } => write!(
                f,
                "file is too large ({} > {})",
                crate::file::format_bytes(*size),
                crate::file::format_bytes(*limit)
            ),
            RejectReason::UnsupportedType {
                extension: Some(ext),
            } => write!(f, "{} files are not accepted", ext),
            RejectReason::UnsupportedType { extension: None } => {
                write!(f, "file has no extension")
            }
            RejectReason::UnsupportedMime { mime } => {
                write!(f, "type {} is not accepted", mime)
            }
        }
    }
}

impl AcceptPolicy {
    /// Check a candidate against the size limit and allowlists.
    ///
    /// The extension is mandatory. A declared MIME type must also be
    /// allowed; an empty one is tolerated since browsers omit it for
    /// some sources.
    pub fn check<P>(&self, file: &SelectedFile<P>) -> Result<(), RejectReason> {
        if file.size == 0 {
            return Err(RejectReason::Empty);
        }

        if file.size > self.max_file_size {
            return Err(RejectReason::TooLarge {
                size: file.size,
                limit: self.max_file_size,
            });
        }

        let extension = file.extension();
        let extension_ok = extension
            .as_deref()
            .map(|ext| self.accepted_extensions.iter().any(|a| a == ext))
            .unwrap_or(false);
        if !extension_ok {
            return Err(RejectReason::UnsupportedType { extension });
        }

        let mime = file.mime.trim().to_ascii_lowercase();
        if !mime.is_empty() && !self.accepted_mime_types.iter().any(|m| *m == mime) {
            return Err(RejectReason::UnsupportedMime { mime });
        }

        Ok(())
    }
}
