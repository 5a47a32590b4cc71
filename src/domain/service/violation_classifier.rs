//! Violation qualification and record construction
//!
//! Decides whether a completed vision analysis constitutes a reportable
//! violation and, when it does, builds the full penalty record. The
//! decision is one-shot and synchronous; id and clock generation are
//! injected so the construction stays deterministic under test.

use crate::constants::{PENALTY_HIGH_SEVERITY, PENALTY_STANDARD, SMOKE_SCORE_LIMIT};
use crate::types::{
    DetectionContext, SmokeSeverity, ViolationRecord, ViolationStatus, VisionAnalysis,
};
use chrono::{DateTime, Local};

/// Source of violation ids and capture timestamps
pub trait RecordSource {
    /// Fresh id, unique across the process lifetime
    fn violation_id(&self) -> String;

    /// Capture-time wall clock
    fn now(&self) -> DateTime<Local>;
}

/// Production source: random ids, system clock
pub struct SystemRecordSource;

impl RecordSource for SystemRecordSource {
    fn violation_id(&self) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        format!("VIO-{}", token[..8].to_uppercase())
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Qualification rule: severe emission AND enough model confidence.
///
/// The confidence gate models legal defensibility, not detection: a
/// qualifying plume below the threshold is suppressed, not reported.
pub fn qualifies(analysis: &VisionAnalysis, confidence_threshold: f64) -> bool {
    let severe = analysis.smoke_severity == SmokeSeverity::High
        || analysis.smoke_score > SMOKE_SCORE_LIMIT;
    severe && analysis.confidence >= confidence_threshold
}

/// Decide whether the analysis is a reportable violation and build the
/// record. Returns `None` when the detection does not qualify; the caller
/// must not advance its reporting flow in that case.
pub fn classify(
    analysis: &VisionAnalysis,
    plate: &str,
    confidence_threshold: f64,
    context: &DetectionContext,
    source: &dyn RecordSource,
) -> Option<ViolationRecord> {
    if !qualifies(analysis, confidence_threshold) {
        return None;
    }

    // Two-tier schedule: the fine depends on the severity grade only,
    // never on the raw score.
    let penalty = match analysis.smoke_severity {
        SmokeSeverity::High => PENALTY_HIGH_SEVERITY,
        _ => PENALTY_STANDARD,
    };

    Some(ViolationRecord {
        violation_id: source.violation_id(),
        vehicle_number: plate.to_string(),
        vehicle_type: analysis.vehicle_type.clone(),
        vehicle_color: analysis.vehicle_color.clone(),
        smoke_severity: analysis.smoke_severity,
        smoke_score: analysis.smoke_score,
        ai_confidence: analysis.confidence,
        timestamp: source.now().format("%Y-%m-%d %H:%M:%S").to_string(),
        penalty: penalty.to_string(),
        image_url: context.captured_image.clone(),
        location: context.zone.clone(),
        status: ViolationStatus::Pending,
        ai_reasoning: build_reasoning(analysis, confidence_threshold, context),
    })
}

/// Fixed-template justification lines for the penalty notice.
/// Always 2-4 entries so the notice view has content to render.
fn build_reasoning(
    analysis: &VisionAnalysis,
    confidence_threshold: f64,
    context: &DetectionContext,
) -> Vec<String> {
    let vehicle = if analysis.vehicle_type.is_empty() {
        "vehicle".to_string()
    } else {
        analysis.vehicle_type.to_lowercase()
    };

    vec![
        format!(
            "Visible exhaust plume from the {} measured at {:.0}% opacity.",
            vehicle,
            analysis.smoke_score * 100.0
        ),
        format!(
            "Emission severity graded {} by vision analysis.",
            analysis.smoke_severity
        ),
        format!(
            "Model confidence {:.0}% meets the enforcement threshold of {:.0}%.",
            analysis.confidence, confidence_threshold
        ),
        format!("Frame captured at {}.", context.zone),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedRecordSource;

    impl RecordSource for FixedRecordSource {
        fn violation_id(&self) -> String {
            "VIO-FIXED001".to_string()
        }

        fn now(&self) -> DateTime<Local> {
            Local.with_ymd_and_hms(2024, 5, 20, 10, 30, 0).unwrap()
        }
    }

    fn analysis(severity: SmokeSeverity, score: f64, confidence: f64) -> VisionAnalysis {
        VisionAnalysis {
            vehicle_type: "Truck".to_string(),
            vehicle_color: "Yellow".to_string(),
            smoke_severity: severity,
            smoke_score: score,
            confidence,
            description: "test".to_string(),
            environmental_factors: None,
            maintenance_tip: "test".to_string(),
        }
    }

    fn context() -> DetectionContext {
        DetectionContext {
            zone: "Zone A - Monitoring Point".to_string(),
            captured_image: "frames/cam01.jpg".to_string(),
        }
    }

    #[test]
    fn high_severity_with_confidence_gets_high_tier_fine() {
        let record = classify(
            &analysis(SmokeSeverity::High, 0.9, 95.0),
            "DL3CAS9921",
            85.0,
            &context(),
            &FixedRecordSource,
        )
        .expect("should qualify");

        assert_eq!(record.penalty, PENALTY_HIGH_SEVERITY);
        assert_eq!(record.status, ViolationStatus::Pending);
        assert_eq!(record.vehicle_number, "DL3CAS9921");
        assert_eq!(record.location, "Zone A - Monitoring Point");
        assert_eq!(record.image_url, "frames/cam01.jpg");
        assert_eq!(record.timestamp, "2024-05-20 10:30:00");
    }

    #[test]
    fn low_severity_low_score_does_not_qualify() {
        let record = classify(
            &analysis(SmokeSeverity::Low, 0.2, 95.0),
            "DL3CAS9921",
            85.0,
            &context(),
            &FixedRecordSource,
        );
        assert!(record.is_none());
    }

    #[test]
    fn confidence_gate_suppresses_qualifying_detection() {
        let record = classify(
            &analysis(SmokeSeverity::High, 0.9, 60.0),
            "DL3CAS9921",
            85.0,
            &context(),
            &FixedRecordSource,
        );
        assert!(record.is_none());
    }

    #[test]
    fn moderate_severity_qualifies_via_score_at_low_tier() {
        let record = classify(
            &analysis(SmokeSeverity::Moderate, 0.5, 90.0),
            "KA05MJ1234",
            85.0,
            &context(),
            &FixedRecordSource,
        )
        .expect("should qualify via score");

        assert_eq!(record.penalty, PENALTY_STANDARD);
        assert_eq!(record.smoke_severity, SmokeSeverity::Moderate);
    }

    #[test]
    fn score_at_limit_does_not_qualify() {
        // Strict inequality on the score side of the disjunction.
        assert!(!qualifies(&analysis(SmokeSeverity::Low, 0.4, 99.0), 85.0));
        assert!(qualifies(&analysis(SmokeSeverity::Low, 0.41, 99.0), 85.0));
    }

    #[test]
    fn confidence_exactly_at_threshold_passes() {
        assert!(qualifies(&analysis(SmokeSeverity::High, 0.9, 85.0), 85.0));
    }

    #[test]
    fn zero_value_analysis_never_qualifies() {
        // The substitute the caller uses when the vision provider fails.
        assert!(!qualifies(&VisionAnalysis::unavailable("timeout"), 50.0));
    }

    #[test]
    fn reasoning_is_bounded_and_mentions_the_vehicle() {
        let record = classify(
            &analysis(SmokeSeverity::High, 0.82, 94.0),
            "KA05MJ1234",
            85.0,
            &context(),
            &FixedRecordSource,
        )
        .unwrap();

        assert!((2..=4).contains(&record.ai_reasoning.len()));
        assert!(record.ai_reasoning[0].contains("truck"));
        assert!(record.ai_reasoning[0].contains("82%"));
        assert!(record
            .ai_reasoning
            .iter()
            .any(|line| line.contains("Zone A - Monitoring Point")));
    }

    #[test]
    fn classification_is_deterministic_with_fixed_source() {
        let a = classify(
            &analysis(SmokeSeverity::High, 0.9, 95.0),
            "KA05MJ1234",
            85.0,
            &context(),
            &FixedRecordSource,
        )
        .unwrap();
        let b = classify(
            &analysis(SmokeSeverity::High, 0.9, 95.0),
            "KA05MJ1234",
            85.0,
            &context(),
            &FixedRecordSource,
        )
        .unwrap();
        assert_eq!(a.violation_id, b.violation_id);
        assert_eq!(a.timestamp, b.timestamp);
        assert_eq!(a.ai_reasoning, b.ai_reasoning);
    }

    #[test]
    fn system_source_produces_distinct_readable_ids() {
        let source = SystemRecordSource;
        let first = source.violation_id();
        let second = source.violation_id();
        assert_ne!(first, second);
        for id in [&first, &second] {
            assert!(id.starts_with("VIO-"));
            assert_eq!(id.len(), 12);
            assert!(id[4..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }
}
