//! Application service layer - detection use case

pub mod detection_service;

pub use detection_service::{
    detect_emission, DetectionOptions, DetectionOutcome, DetectionServiceError, ProgressCallback,
};
