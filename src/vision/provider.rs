//! Vision-model provider client
//!
//! Posts the frame and analysis prompt to a Gemini-style REST endpoint and
//! parses the structured JSON reply into a `VisionAnalysis`.

use crate::constants::prompts::build_analysis_prompt;
use crate::error::{Error, Result};
use crate::types::VisionAnalysis;
use crate::vision::extract_json_from_response;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::warn;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Vision provider configuration
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: std::env::var(API_KEY_VAR).ok(),
            timeout_secs: 30,
        }
    }
}

impl VisionConfig {
    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Analyze a vehicle frame and return the emission analysis.
///
/// Fails on transport or provider errors; the caller substitutes the
/// zero-confidence analysis so the pipeline never aborts on this path.
pub fn analyze_image(image_path: &Path, config: &VisionConfig) -> Result<VisionAnalysis> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| Error::AnalysisFailed(format!("{} is not set", API_KEY_VAR)))?;

    let bytes = std::fs::read(image_path)?;
    let body = json!({
        "contents": [{
            "parts": [
                { "text": build_analysis_prompt() },
                { "inline_data": { "mime_type": "image/jpeg", "data": BASE64.encode(&bytes) } }
            ]
        }],
        "generationConfig": { "responseMimeType": "application/json" }
    });

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let url = format!(
        "{}/{}:generateContent?key={}",
        config.endpoint, config.model, api_key
    );
    let response = client.post(&url).json(&body).send()?;

    if !response.status().is_success() {
        return Err(Error::AnalysisFailed(format!(
            "vision provider returned {}",
            response.status()
        )));
    }

    let value: serde_json::Value = response.json()?;
    let text = value["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::AnalysisFailed(
            "vision provider returned no content".to_string(),
        ));
    }

    Ok(parse_analysis(text))
}

/// Parse the model's JSON payload into a `VisionAnalysis`.
///
/// A malformed payload degrades to the failed-analysis substitute rather
/// than erroring; out-of-range numbers are clamped to their contracts.
pub fn parse_analysis(response: &str) -> VisionAnalysis {
    let json_str = extract_json_from_response(response);

    let mut analysis: VisionAnalysis = match serde_json::from_str(&json_str) {
        Ok(parsed) => parsed,
        Err(e) => {
            let truncated: String = response.chars().take(200).collect();
            warn!("vision response parse failed: {} - raw: {}", e, truncated);
            return VisionAnalysis::unavailable(&format!("unparseable analysis: {}", e));
        }
    };

    analysis.smoke_score = analysis.smoke_score.clamp(0.0, 1.0);
    analysis.confidence = analysis.confidence.clamp(0.0, 100.0);
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SmokeSeverity;

    #[test]
    fn parses_clean_payload() {
        let analysis = parse_analysis(
            r#"{"vehicleType":"Bus","vehicleColor":"Red","smokeSeverity":"Moderate",
                "smokeScore":0.55,"confidence":88,"description":"d","maintenanceTip":"t"}"#,
        );
        assert_eq!(analysis.vehicle_type, "Bus");
        assert_eq!(analysis.smoke_severity, SmokeSeverity::Moderate);
        assert_eq!(analysis.confidence, 88.0);
    }

    #[test]
    fn parses_fenced_payload() {
        let analysis = parse_analysis(
            "```json\n{\"vehicleType\":\"Car\",\"smokeSeverity\":\"High\",\"smokeScore\":0.7,\"confidence\":91}\n```",
        );
        assert_eq!(analysis.vehicle_type, "Car");
        assert_eq!(analysis.smoke_severity, SmokeSeverity::High);
    }

    #[test]
    fn clamps_out_of_range_numbers() {
        let analysis =
            parse_analysis(r#"{"smokeScore": 1.7, "confidence": 140, "smokeSeverity": "Low"}"#);
        assert_eq!(analysis.smoke_score, 1.0);
        assert_eq!(analysis.confidence, 100.0);
    }

    #[test]
    fn garbage_degrades_to_failed_analysis() {
        let analysis = parse_analysis("the model refused to answer");
        assert_eq!(analysis.vehicle_type, "Analysis Failed");
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let config = VisionConfig {
            api_key: None,
            ..VisionConfig::default()
        };
        let err = analyze_image(Path::new("nonexistent.jpg"), &config).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
