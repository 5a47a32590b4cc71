//! Image validation and directory scanning

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supported image extensions
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// Check if a path is a supported image file
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validate an image file exists and is readable
pub fn validate_image(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a file",
            path.display()
        )));
    }

    if !is_supported_image(path) {
        return Err(Error::InvalidImageFormat(format!(
            "Unsupported image format: {}",
            path.display()
        )));
    }

    // Decode to confirm the file is an actual image
    image::open(path)?;

    Ok(())
}

/// Scan a directory for image files
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    if !dir.is_dir() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported_image(path))
        .collect();

    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_image(Path::new("frame.JPG")));
        assert!(is_supported_image(Path::new("frame.png")));
        assert!(!is_supported_image(Path::new("frame.txt")));
        assert!(!is_supported_image(Path::new("frame")));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = validate_image(Path::new("/no/such/frame.jpg")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "text").unwrap();
        let err = validate_image(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidImageFormat(_)));
    }

    #[test]
    fn scan_finds_only_images_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("skip.txt"), b"x").unwrap();

        let images = scan_directory(dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn scanning_a_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        fs::write(&path, b"x").unwrap();
        assert!(scan_directory(&path).is_err());
    }
}
