//! Fixed values: penalty schedule, plate extraction bounds, defaults

pub mod prompts;

/// Fine for a High-severity violation (two-tier schedule, upper tier)
pub const PENALTY_HIGH_SEVERITY: &str = "Rs. 5000";

/// Fine for any other qualifying violation (lower tier)
pub const PENALTY_STANDARD: &str = "Rs. 2000";

/// Placeholder plate returned when OCR text yields nothing usable.
/// Plate-shaped on purpose so downstream rendering stays stable.
pub const FALLBACK_PLATE: &str = "DL00AA0000";

/// Opacity score above which a detection qualifies regardless of severity
pub const SMOKE_SCORE_LIMIT: f64 = 0.4;

/// Cleaned OCR text shorter than this falls through to the sentinel
pub const CLEANED_PLATE_MIN: usize = 5;

/// Cleaned OCR text is truncated to this many characters
pub const CLEANED_PLATE_MAX: usize = 10;

/// Monitoring zone used when none is configured
pub const DEFAULT_ZONE: &str = "Zone A - Monitoring Point";

/// Default enforcement confidence gate (operator-adjustable 50-99)
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 85.0;

/// Lowest accepted confidence threshold
pub const CONFIDENCE_THRESHOLD_MIN: f64 = 50.0;

/// Highest accepted confidence threshold
pub const CONFIDENCE_THRESHOLD_MAX: f64 = 99.0;
