//! Cache for provider results
//!
//! Keyed by the sha256 of the image bytes, so re-analyzing the same frame
//! skips both provider calls.

use crate::error::Result;
use crate::types::VisionAnalysis;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Per-image provider results, cached together so a hit skips the whole
/// fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSnapshot {
    /// Vision-model analysis of the frame
    pub analysis: VisionAnalysis,
    /// Raw OCR text, possibly empty
    pub raw_text: String,
}

/// Cache manager for provider snapshots
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    /// Create a new cache manager
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// Cache key for an image file (streaming hash for memory efficiency)
    fn cache_key(image_path: &Path) -> Result<String> {
        let file = File::open(image_path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Get the cached snapshot for an image
    pub fn get(&self, image_path: &Path) -> Result<Option<ProviderSnapshot>> {
        let entry = self.entry_path(&Self::cache_key(image_path)?);

        if !entry.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&entry)?;
        let snapshot: ProviderSnapshot = serde_json::from_str(&content)?;
        Ok(Some(snapshot))
    }

    /// Store a snapshot for an image
    pub fn set(&self, image_path: &Path, snapshot: &ProviderSnapshot) -> Result<()> {
        let entry = self.entry_path(&Self::cache_key(image_path)?);
        let content = serde_json::to_string_pretty(snapshot)?;
        fs::write(&entry, content)?;
        Ok(())
    }

    /// Clear all cached snapshots, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let mut count = 0;

        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                fs::remove_file(&path)?;
                count += 1;
            }
        }

        Ok(count)
    }

    /// Cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let mut entry_count = 0;
        let mut total_size_bytes = 0u64;

        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|e| e == "json") {
                entry_count += 1;
                if let Ok(metadata) = entry.metadata() {
                    total_size_bytes += metadata.len();
                }
            }
        }

        Ok(CacheStats {
            entry_count,
            total_size_bytes,
            cache_dir: self.cache_dir.clone(),
        })
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size_bytes: u64,
    pub cache_dir: PathBuf,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cache Statistics")?;
        writeln!(f, "================")?;
        writeln!(f, "Entries:    {}", self.entry_count)?;
        writeln!(
            f,
            "Total size: {:.2} KB",
            self.total_size_bytes as f64 / 1024.0
        )?;
        write!(f, "Location:   {}", self.cache_dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn snapshot() -> ProviderSnapshot {
        ProviderSnapshot {
            analysis: VisionAnalysis {
                vehicle_type: "Truck".to_string(),
                confidence: 92.0,
                ..VisionAnalysis::default()
            },
            raw_text: "KA05MJ1234".to_string(),
        }
    }

    #[test]
    fn get_set_roundtrip() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("frame.jpg");
        fs::write(&image, b"not really a jpeg").unwrap();

        let cache = Cache::new(dir.path().join("cache")).unwrap();
        assert!(cache.get(&image).unwrap().is_none());

        cache.set(&image, &snapshot()).unwrap();
        let cached = cache.get(&image).unwrap().expect("should hit");
        assert_eq!(cached.raw_text, "KA05MJ1234");
        assert_eq!(cached.analysis.vehicle_type, "Truck");
    }

    #[test]
    fn different_bytes_do_not_collide() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"frame a").unwrap();
        fs::write(&b, b"frame b").unwrap();

        let cache = Cache::new(dir.path().join("cache")).unwrap();
        cache.set(&a, &snapshot()).unwrap();
        assert!(cache.get(&b).unwrap().is_none());
    }

    #[test]
    fn clear_removes_entries_and_reports_count() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("frame.jpg");
        fs::write(&image, b"bytes").unwrap();

        let cache = Cache::new(dir.path().join("cache")).unwrap();
        cache.set(&image, &snapshot()).unwrap();

        assert_eq!(cache.clear().unwrap(), 1);
        assert!(cache.get(&image).unwrap().is_none());
        assert_eq!(cache.stats().unwrap().entry_count, 0);
    }
}
