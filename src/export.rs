//! CSV export of the violation log

use crate::domain::repository::ViolationRepository;
use crate::error::Result;
use std::path::Path;

/// Column headers for the exported challan sheet
const HEADERS: &[&str] = &[
    "Violation ID",
    "Vehicle Number",
    "Type",
    "Color",
    "Severity",
    "Opacity",
    "Penalty",
    "Timestamp",
    "Location",
    "Status",
    "Confidence",
];

/// Write the whole violation log (newest first) to a CSV file.
/// Returns the number of exported records.
pub fn export_violations_csv(repo: &dyn ViolationRepository, output: &Path) -> Result<usize> {
    let records = repo.find_all()?;

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(HEADERS)?;

    for record in &records {
        let row = vec![
            record.violation_id.clone(),
            record.vehicle_number.clone(),
            record.vehicle_type.clone(),
            record.vehicle_color.clone(),
            record.smoke_severity.to_string(),
            format!("{:.1}%", record.smoke_score * 100.0),
            record.penalty.clone(),
            record.timestamp.clone(),
            record.location.clone(),
            record.status.to_string(),
            format!("{:.0}%", record.ai_confidence),
        ];
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::FileViolationRepository;
    use crate::types::{SmokeSeverity, ViolationRecord, ViolationStatus};
    use tempfile::tempdir;

    fn record(id: &str) -> ViolationRecord {
        ViolationRecord {
            violation_id: id.to_string(),
            vehicle_number: "DL3CAS9921".to_string(),
            vehicle_type: "Truck".to_string(),
            vehicle_color: "Yellow".to_string(),
            smoke_severity: SmokeSeverity::High,
            smoke_score: 0.82,
            ai_confidence: 94.0,
            timestamp: "2024-05-20 10:30:00".to_string(),
            penalty: "Rs. 5000".to_string(),
            image_url: "frame.jpg".to_string(),
            location: "Zone A - Main".to_string(),
            status: ViolationStatus::Pending,
            ai_reasoning: vec!["reason".to_string()],
        }
    }

    #[test]
    fn exports_header_and_rows_newest_first() {
        let dir = tempdir().unwrap();
        let repo = FileViolationRepository::open(dir.path().to_path_buf()).unwrap();
        repo.save(&record("VIO-OLD00001")).unwrap();
        repo.save(&record("VIO-NEW00001")).unwrap();

        let output = dir.path().join("challans.csv");
        let count = export_violations_csv(&repo, &output).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Violation ID,Vehicle Number"));
        assert!(lines[1].starts_with("VIO-NEW00001"));
        assert!(lines[2].starts_with("VIO-OLD00001"));
        assert!(lines[1].contains("82.0%"));
        assert!(lines[1].contains("Rs. 5000"));
    }

    #[test]
    fn empty_log_exports_header_only() {
        let dir = tempdir().unwrap();
        let repo = FileViolationRepository::open(dir.path().to_path_buf()).unwrap();

        let output = dir.path().join("challans.csv");
        let count = export_violations_csv(&repo, &output).unwrap();
        assert_eq!(count, 0);

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
