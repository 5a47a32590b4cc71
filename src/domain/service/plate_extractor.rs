//! License plate extraction from noisy OCR text
//!
//! OCR output for a vehicle frame is unstructured: line breaks, stray
//! punctuation, sometimes nothing at all. This service derives a
//! plate-shaped string from whatever came back and never fails outright.

use crate::constants::{CLEANED_PLATE_MAX, CLEANED_PLATE_MIN, FALLBACK_PLATE};
use once_cell::sync::Lazy;
use regex::Regex;

/// Regional plate grammar: two letters, one-or-two digits, one-or-two
/// letters, four digits, with optional single spaces between groups
/// (e.g. "KA05MJ1234", "ka 05 mj 1234"). Heuristic, not a checksum.
static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[A-Z]{2} ?[0-9]{1,2} ?[A-Z]{1,2} ?[0-9]{4}").unwrap());

/// Derive a best-guess plate string from raw OCR text.
///
/// Tries the regional grammar first and returns the first match,
/// uppercased with its internal spacing preserved. Otherwise strips the
/// whole text down to alphanumerics and returns a bounded prefix. When
/// even that yields nothing usable, returns a fixed placeholder so the
/// result is always a non-empty, plate-shaped string.
pub fn extract_plate(raw: &str) -> String {
    if let Some(m) = PLATE_RE.find(raw) {
        return m.as_str().to_uppercase();
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    if cleaned.len() > CLEANED_PLATE_MIN {
        cleaned.chars().take(CLEANED_PLATE_MAX).collect()
    } else {
        FALLBACK_PLATE.to_string()
    }
}
