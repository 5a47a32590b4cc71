//! Core types for emission violation detection

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize null as default value
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Coarse three-level classification of emission intensity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmokeSeverity {
    #[default]
    Low,
    Moderate,
    High,
}

impl SmokeSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            SmokeSeverity::Low => "Low",
            SmokeSeverity::Moderate => "Moderate",
            SmokeSeverity::High => "High",
        }
    }
}

impl std::fmt::Display for SmokeSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Vision-model analysis of a single vehicle image
///
/// Field names follow the provider's JSON payload. Deserialization is
/// null-tolerant so a sloppy model response still parses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionAnalysis {
    /// Vehicle class: "Car", "Bus", "Truck", "Motorcycle"
    #[serde(default, deserialize_with = "null_to_default")]
    pub vehicle_type: String,

    /// Dominant vehicle color
    #[serde(default, deserialize_with = "null_to_default")]
    pub vehicle_color: String,

    /// Emission severity grade
    #[serde(default, deserialize_with = "null_to_default")]
    pub smoke_severity: SmokeSeverity,

    /// Normalized opacity estimate (0.0 - 1.0)
    #[serde(default, deserialize_with = "null_to_default")]
    pub smoke_score: f64,

    /// Model confidence (0 - 100)
    #[serde(default, deserialize_with = "null_to_default")]
    pub confidence: f64,

    /// Free-form scene description
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,

    /// Environmental context, if the model reported any
    #[serde(default)]
    pub environmental_factors: Option<String>,

    /// Suggested engine maintenance based on smoke color
    #[serde(default, deserialize_with = "null_to_default")]
    pub maintenance_tip: String,
}

impl Default for VisionAnalysis {
    fn default() -> Self {
        Self {
            vehicle_type: String::new(),
            vehicle_color: String::new(),
            smoke_severity: SmokeSeverity::Low,
            smoke_score: 0.0,
            confidence: 0.0,
            description: String::new(),
            environmental_factors: None,
            maintenance_tip: String::new(),
        }
    }
}

impl VisionAnalysis {
    /// Zero-confidence substitute used when the vision provider is
    /// unavailable. Classification rejects it naturally.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            vehicle_type: "Analysis Failed".to_string(),
            vehicle_color: "N/A".to_string(),
            description: format!("Error: {}", reason),
            maintenance_tip: "Check engine diagnostic port for manual readout.".to_string(),
            ..Self::default()
        }
    }
}

/// Delivery status of a violation record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationStatus {
    #[default]
    Pending,
    Sent,
}

impl ViolationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ViolationStatus::Pending => "Pending",
            ViolationStatus::Sent => "Sent",
        }
    }
}

impl std::fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A recorded emission violation with its penalty notice fields
///
/// Immutable after creation except for the Pending -> Sent status
/// transition handled by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    /// Unique id, e.g. "VIO-1A2B3C4D"
    pub violation_id: String,
    /// License plate as derived from OCR (or operator override)
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub vehicle_color: String,
    pub smoke_severity: SmokeSeverity,
    pub smoke_score: f64,
    pub ai_confidence: f64,
    /// Capture-time wall clock, locale-displayable
    pub timestamp: String,
    /// Currency-formatted fine amount from the two-tier schedule
    pub penalty: String,
    /// Path or URL of the captured frame
    pub image_url: String,
    /// Monitoring zone the frame came from
    pub location: String,
    pub status: ViolationStatus,
    /// Ordered justification lines for the penalty notice, never empty
    pub ai_reasoning: Vec<String>,
}

/// Per-invocation detection context supplied by the caller
#[derive(Debug, Clone)]
pub struct DetectionContext {
    /// Active monitoring zone name
    pub zone: String,
    /// Reference to the captured image (path or URL)
    pub captured_image: String,
}
