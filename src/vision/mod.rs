//! Vision module - external provider clients for emission detection
//!
//! This module provides:
//! - Vision-model analysis of vehicle frames (smoke severity, score, confidence)
//! - OCR text recognition for license plate reading
//! - Per-image caching of provider results
//!
//! Both providers are collaborators the pipeline degrades around: a failed
//! vision call becomes a zero-confidence analysis, a failed OCR call becomes
//! empty text, and neither aborts a detection.

pub mod cache;
pub mod ocr;
pub mod provider;

pub use cache::{Cache, ProviderSnapshot};
pub use ocr::{recognize_text, OcrConfig};
pub use provider::{analyze_image, parse_analysis, VisionConfig};

/// Extract JSON from a model response that may be wrapped in markdown fences
pub fn extract_json_from_response(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```json") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').unwrap_or(7) + 1;
            if start < end {
                return response[start..end].trim().to_string();
            }
        }
    }

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').unwrap_or(3) + 1;
            if start < end {
                return response[start..end].trim().to_string();
            }
        }
    }

    response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_passes_through() {
        assert_eq!(extract_json_from_response(r#"{"a":1}"#), r#"{"a":1}"#);
    }

    #[test]
    fn json_fence_is_stripped() {
        let fenced = "```json\n{\"a\":1}\n```";
        assert_eq!(extract_json_from_response(fenced), "{\"a\":1}");
    }

    #[test]
    fn generic_fence_is_stripped() {
        let fenced = "```\n{\"a\":1}\n```";
        assert_eq!(extract_json_from_response(fenced), "{\"a\":1}");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(extract_json_from_response("  {\"a\":1}  \n"), "{\"a\":1}");
    }
}
