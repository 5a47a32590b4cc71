//! OCR provider client for license plate text
//!
//! Posts the frame to an OCR.space-style endpoint and returns the raw
//! parsed text. The caller runs the plate extractor over whatever comes
//! back; an error here degrades to the extractor's fallback chain.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://api.ocr.space/parse/image";
const API_KEY_VAR: &str = "OCR_API_KEY";

/// OCR provider configuration
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// OCR.space engine selector; engine 2 reads plates better
    pub engine: u32,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: std::env::var(API_KEY_VAR).ok(),
            engine: 2,
            timeout_secs: 30,
        }
    }
}

impl OcrConfig {
    pub fn with_engine(mut self, engine: u32) -> Self {
        self.engine = engine;
        self
    }
}

/// Recognize text in a vehicle frame.
///
/// Returns the trimmed parsed text, which may be empty when the provider
/// saw nothing. Provider-side processing errors map to `Error::OcrFailed`.
pub fn recognize_text(image_path: &Path, config: &OcrConfig) -> Result<String> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| Error::OcrFailed(format!("{} is not set", API_KEY_VAR)))?;

    let bytes = std::fs::read(image_path)?;
    let payload = format!("data:image/jpeg;base64,{}", BASE64.encode(&bytes));

    let form = reqwest::blocking::multipart::Form::new()
        .text("base64Image", payload)
        .text("apikey", api_key)
        .text("language", "eng")
        .text("isOverlayRequired", "false")
        .text("detectOrientation", "true")
        .text("scale", "true")
        .text("OCREngine", config.engine.to_string());

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let response = client.post(&config.endpoint).multipart(form).send()?;

    if !response.status().is_success() {
        return Err(Error::OcrFailed(format!(
            "OCR provider returned {}",
            response.status()
        )));
    }

    let value: serde_json::Value = response.json()?;

    if value["IsErroredOnProcessing"].as_bool().unwrap_or(false) {
        return Err(Error::OcrFailed(value["ErrorMessage"].to_string()));
    }

    let text = value["ParsedResults"][0]["ParsedText"]
        .as_str()
        .unwrap_or_default()
        .trim()
        .to_string();

    Ok(text)
}
