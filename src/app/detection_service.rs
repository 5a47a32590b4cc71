//! Detection Service - Core Use Case for Emission Monitoring
//!
//! This service orchestrates the complete detection workflow:
//! 1. Validate input image
//! 2. Check cache for existing provider results
//! 3. Fan out the OCR and vision-model calls, join both
//! 4. Derive the license plate from the OCR text
//! 5. Run the violation decision against the confidence gate
//! 6. Persist any resulting violation record
//! 7. Return the full outcome for display

use crate::config::Config;
use crate::domain::repository::ViolationRepository;
use crate::domain::service::{classify, extract_plate, SystemRecordSource};
use crate::error::Error;
use crate::infrastructure::persistence::FileViolationRepository;
use crate::scanner::validate_image;
use crate::types::{DetectionContext, ViolationRecord, VisionAnalysis};
use crate::vision::{analyze_image, recognize_text, Cache, OcrConfig, ProviderSnapshot, VisionConfig};
use log::warn;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::thread;
use thiserror::Error;

/// Errors specific to the detection service
#[derive(Debug, Error)]
pub enum DetectionServiceError {
    #[error("Image validation failed: {0}")]
    InvalidImage(String),

    #[error("Detection failed: {0}")]
    DetectionFailed(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<Error> for DetectionServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::FileNotFound(msg) | Error::InvalidImageFormat(msg) => {
                DetectionServiceError::InvalidImage(msg)
            }
            Error::Image(e) => DetectionServiceError::InvalidImage(e.to_string()),
            Error::Cache(e) => DetectionServiceError::CacheError(e.to_string()),
            Error::Config(e) => DetectionServiceError::ConfigError(e.to_string()),
            _ => DetectionServiceError::DetectionFailed(err.to_string()),
        }
    }
}

/// Options for a single detection run
#[derive(Debug, Clone)]
pub struct DetectionOptions {
    /// Operator-supplied plate, skipping OCR-based extraction
    pub manual_plate: Option<String>,

    /// Zone override for this run (config zone otherwise)
    pub zone: Option<String>,

    /// Confidence threshold override for this run (config value otherwise)
    pub confidence_threshold: Option<f64>,

    /// Whether to use the provider-result cache
    pub use_cache: bool,

    /// Whether to persist a qualifying violation. Batch mode disables this
    /// and writes all records from one thread after the join.
    pub record: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            manual_plate: None,
            zone: None,
            confidence_threshold: None,
            use_cache: true,
            record: true,
        }
    }
}

impl DetectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manual_plate(mut self, plate: String) -> Self {
        self.manual_plate = Some(plate);
        self
    }

    pub fn with_zone(mut self, zone: String) -> Self {
        self.zone = Some(zone);
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    pub fn with_record(mut self, enabled: bool) -> Self {
        self.record = enabled;
        self
    }
}

/// Result of a detection run
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    /// Vision-model analysis (possibly the zero-confidence substitute)
    pub analysis: VisionAnalysis,

    /// Derived plate string, never empty
    pub plate: String,

    /// sha256 of the frame bytes, shown as the digital proof hash
    pub evidence_hash: String,

    /// The recorded violation, when the detection qualified
    pub violation: Option<ViolationRecord>,

    /// Whether provider results came from cache
    pub from_cache: bool,
}

/// Progress callback for verbose output
pub type ProgressCallback = Box<dyn Fn(&str) + Send>;

/// Main entry point: run the detection pipeline over one frame.
///
/// Provider failures never abort the run: a failed vision call becomes the
/// zero-confidence analysis (which cannot qualify), a failed OCR call
/// becomes empty text (which yields the fallback plate).
pub fn detect_emission(
    image_path: &Path,
    config: &Config,
    options: &DetectionOptions,
    progress: Option<ProgressCallback>,
) -> std::result::Result<DetectionOutcome, DetectionServiceError> {
    let notify = |msg: &str| {
        if let Some(ref cb) = progress {
            cb(msg);
        }
    };

    // Step 1: Validate image
    validate_image(image_path)?;

    let evidence_hash = hash_evidence(image_path)
        .map_err(|e| DetectionServiceError::InvalidImage(e.to_string()))?;

    // Step 2: Initialize cache
    let cache = if options.use_cache && config.cache_enabled {
        config.cache_dir().ok().and_then(|dir| Cache::new(dir).ok())
    } else {
        None
    };

    // Step 3: Provider results, cached or fresh
    let mut from_cache = false;
    let snapshot = match cache.as_ref().and_then(|c| c.get(image_path).ok().flatten()) {
        Some(cached) => {
            notify("Using cached provider results");
            from_cache = true;
            cached
        }
        None => {
            notify("Contacting vision and OCR providers...");
            let snapshot = fetch_providers(image_path, config);

            // Only completed analyses are worth caching; a provider outage
            // should be retried on the next run.
            if snapshot.analysis.confidence > 0.0 {
                if let Some(ref cache) = cache {
                    let _ = cache.set(image_path, &snapshot);
                }
            }
            snapshot
        }
    };

    // Step 4: Derive the plate
    let plate = match options.manual_plate {
        Some(ref manual) => manual.trim().to_uppercase(),
        None => extract_plate(&snapshot.raw_text),
    };
    notify(&format!("Plate: {}", plate));

    // Step 5: Violation decision
    let zone = options.zone.clone().unwrap_or_else(|| config.zone.clone());
    let threshold = options
        .confidence_threshold
        .unwrap_or(config.confidence_threshold);
    let context = DetectionContext {
        zone,
        captured_image: image_path.display().to_string(),
    };

    let violation = classify(
        &snapshot.analysis,
        &plate,
        threshold,
        &context,
        &SystemRecordSource,
    );

    // Step 6: Persist the record
    if let (Some(record), true) = (violation.as_ref(), options.record) {
        notify(&format!("Violation recorded: {}", record.violation_id));
        let store_dir = config
            .store_dir()
            .map_err(|e| DetectionServiceError::StoreError(e.to_string()))?;
        let repo = FileViolationRepository::open(store_dir)
            .map_err(|e| DetectionServiceError::StoreError(e.to_string()))?;
        repo.save(record)
            .map_err(|e| DetectionServiceError::StoreError(e.to_string()))?;
    }

    Ok(DetectionOutcome {
        analysis: snapshot.analysis,
        plate,
        evidence_hash,
        violation,
        from_cache,
    })
}

/// Fan out both provider calls on worker threads and join the results.
/// Either side may fail independently; each degrades on its own.
fn fetch_providers(image_path: &Path, config: &Config) -> ProviderSnapshot {
    let vision_config = VisionConfig::default().with_model(config.model.clone());
    let ocr_config = OcrConfig::default().with_engine(config.ocr_engine);

    let vision_path = image_path.to_path_buf();
    let ocr_path = image_path.to_path_buf();

    let vision_handle = thread::spawn(move || analyze_image(&vision_path, &vision_config));
    let ocr_handle = thread::spawn(move || recognize_text(&ocr_path, &ocr_config));

    let analysis = match vision_handle.join() {
        Ok(Ok(analysis)) => analysis,
        Ok(Err(err)) => {
            warn!("vision provider failed: {}", err);
            VisionAnalysis::unavailable(&err.to_string())
        }
        Err(_) => {
            warn!("vision worker panicked");
            VisionAnalysis::unavailable("vision worker panicked")
        }
    };

    let raw_text = match ocr_handle.join() {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            warn!("OCR provider failed: {}", err);
            String::new()
        }
        Err(_) => {
            warn!("OCR worker panicked");
            String::new()
        }
    };

    ProviderSnapshot { analysis, raw_text }
}

/// sha256 of the frame bytes, displayed as the digital proof hash
fn hash_evidence(image_path: &Path) -> crate::error::Result<String> {
    let file = File::open(image_path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder_chains() {
        let options = DetectionOptions::new()
            .with_manual_plate("ka05mj1234".to_string())
            .with_zone("Zone B".to_string())
            .with_confidence_threshold(70.0)
            .with_cache(false);

        assert_eq!(options.manual_plate.as_deref(), Some("ka05mj1234"));
        assert_eq!(options.zone.as_deref(), Some("Zone B"));
        assert_eq!(options.confidence_threshold, Some(70.0));
        assert!(!options.use_cache);
    }

    #[test]
    fn invalid_image_maps_to_service_error() {
        let config = Config::default();
        let err = detect_emission(
            Path::new("/no/such/frame.jpg"),
            &config,
            &DetectionOptions::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DetectionServiceError::InvalidImage(_)));
    }
}
