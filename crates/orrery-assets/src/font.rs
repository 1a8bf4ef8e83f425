use std::path::Path;

use crate::error::AssetError;

/// Read a font file into memory.
///
/// The label is built once at startup, so this is a plain synchronous read;
/// parsing and tessellation happen downstream.
pub fn load_font_bytes(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_reports_path() {
        let path = Path::new("/nonexistent/font.ttf");
        let err = load_font_bytes(path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/nonexistent/font.ttf"));
    }

    #[test]
    fn test_reads_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, b"not really a font").unwrap();
        let bytes = load_font_bytes(&path).unwrap();
        assert_eq!(bytes, b"not really a font");
    }
}
