//! Terminal rendition of the widget surface
//!
//! Notices go to stderr, JSON results to stdout, and downloads are written
//! into the output directory.

use pdfdrop_core::{format_bytes, Artifact, FileSummary, Notice, NoticeLevel, UiSurface};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub struct TerminalSurface {
    output_dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl TerminalSurface {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            saved: Vec::new(),
        }
    }

    /// Paths written so far
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl UiSurface for TerminalSurface {
    fn render_files(&mut self, files: &[FileSummary]) {
        for file in files {
            debug!(index = file.index, name = %file.name, size = %format_bytes(file.size), "staged");
        }
    }

    fn show_notice(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => eprintln!("{}", notice.message),
        }
    }

    fn set_progress(&mut self, percent: u8) {
        debug!(percent, "progress");
    }

    fn offer_download(&mut self, artifact: &Artifact) -> Result<(), String> {
        match save_artifact(&self.output_dir, artifact) {
            Ok(path) => {
                info!(
                    path = %path.display(),
                    size = %format_bytes(artifact.bytes.len() as u64),
                    "saved result"
                );
                self.saved.push(path);
                Ok(())
            }
            Err(err) => {
                error!(filename = %artifact.filename, error = %err, "failed to save result");
                Err(format!(
                    "Failed to write {} to {}: {}",
                    artifact.filename,
                    self.output_dir.display(),
                    err
                ))
            }
        }
    }

    fn display_json(&mut self, value: &Value) {
        match serde_json::to_string_pretty(value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", value),
        }
    }

    fn reset_inputs(&mut self) {}
}

/// Write `artifact` into `dir` under a sanitized name
pub fn save_artifact(dir: &Path, artifact: &Artifact) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(sanitize_filename(&artifact.filename));
    std::fs::write(&path, &artifact.bytes)?;
    Ok(path)
}

/// Make a server-suggested name safe to create inside the output directory.
///
/// Path separators and reserved characters become `_`, control characters
/// are dropped, leading/trailing dots and whitespace are trimmed, and the
/// length is capped at 200 characters.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter_map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => Some('_'),
            '\0'..='\x1f' | '\x7f' => None,
            c => Some(c),
        })
        .collect();

    let trimmed = sanitized.trim().trim_matches('.');
    let limited: String = trimmed.chars().take(200).collect();

    if limited.is_empty() {
        "output".to_string()
    } else {
        limited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_keeps_normal_names() {
        assert_eq!(sanitize_filename("merged.pdf"), "merged.pdf");
        assert_eq!(sanitize_filename("my report (1).pdf"), "my report (1).pdf");
    }

    #[test]
    fn test_sanitize_path_traversal() {
        let result = sanitize_filename("../../../etc/passwd");
        assert!(!result.contains('/'));
        assert!(!result.starts_with('.'));
    }

    #[test]
    fn test_sanitize_windows_path() {
        let result = sanitize_filename("C:\\Windows\\System32\\config");
        assert!(!result.contains('\\'));
        assert!(!result.contains(':'));
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "output");
        assert_eq!(sanitize_filename(".."), "output");
        assert_eq!(sanitize_filename("\u{1}\u{2}"), "output");
    }

    #[test]
    fn test_sanitize_limits_length() {
        let long = "é".repeat(300);
        assert_eq!(sanitize_filename(&long).chars().count(), 200);
    }

    #[test]
    fn test_save_artifact_writes_inside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact {
            filename: "../escape.pdf".to_string(),
            mime: "application/pdf".to_string(),
            bytes: b"%PDF-1.7".to_vec(),
        };

        let path = save_artifact(dir.path(), &artifact).unwrap();

        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7".to_vec());
    }

    #[test]
    fn test_failed_write_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let mut surface = TerminalSurface::new(blocker);
        let err = surface
            .offer_download(&Artifact {
                filename: "output.pdf".to_string(),
                mime: "application/pdf".to_string(),
                bytes: vec![1],
            })
            .unwrap_err();

        assert!(surface.saved().is_empty());
        assert!(err.starts_with("Failed to write output.pdf"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn sanitized_name_is_a_single_component(name in "\\PC{0,80}") {
            let sanitized = sanitize_filename(&name);
            let path = Path::new(&sanitized);

            prop_assert!(!sanitized.is_empty());
            prop_assert!(!sanitized.contains('/'));
            prop_assert!(!sanitized.contains('\\'));
            prop_assert_eq!(path.components().count(), 1);
        }
    }
}
