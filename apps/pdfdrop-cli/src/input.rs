//! Local files as widget candidates

use anyhow::{Context, Result};
use pdfdrop_core::SelectedFile;
use std::path::Path;

/// Read a file from disk. Acceptance is left to the widget's policy.
pub fn load_file(path: &Path) -> Result<SelectedFile<Vec<u8>>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", path.display()))?;
    let mime = guess_mime(&name);

    Ok(SelectedFile::from_bytes(name, mime, bytes))
}

/// MIME type from the file extension; empty when unknown
pub fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" => "text/plain",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("report.pdf"), "application/pdf");
        assert_eq!(guess_mime("REPORT.PDF"), "application/pdf");
        assert_eq!(guess_mime("scan.JPEG"), "image/jpeg");
        assert_eq!(guess_mime("archive.tar.gz"), "");
        assert_eq!(guess_mime("README"), "");
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = load_file(&path).unwrap();
        assert_eq!(file.name, "input.pdf");
        assert_eq!(file.size, 8);
        assert_eq!(file.mime, "application/pdf");
        assert_eq!(file.payload, b"%PDF-1.7".to_vec());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/nonexistent/input.pdf")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
