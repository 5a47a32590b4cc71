//! Output formatting module

use crate::app::DetectionOutcome;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::types::ViolationRecord;

/// Print a detection outcome in the requested format
pub fn output_detection(output_format: OutputFormat, outcome: &DetectionOutcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&serde_json::json!({
            "analysis": outcome.analysis,
            "plate": outcome.plate,
            "evidenceHash": outcome.evidence_hash,
            "violation": outcome.violation,
            "fromCache": outcome.from_cache,
        }))?;
        println!("{}", content);
        return Ok(());
    }

    let analysis = &outcome.analysis;

    println!("\nDetection Result");
    println!("================");
    println!("Vehicle:        {} ({})", analysis.vehicle_type, analysis.vehicle_color);
    println!("Plate:          {}", outcome.plate);
    println!("Severity:       {}", analysis.smoke_severity);
    println!("Opacity:        {:.0}%", analysis.smoke_score * 100.0);
    println!("Confidence:     {:.0}%", analysis.confidence);
    if !analysis.description.is_empty() {
        println!("Description:    {}", analysis.description);
    }
    if !analysis.maintenance_tip.is_empty() {
        println!("Maintenance:    {}", analysis.maintenance_tip);
    }
    if let Some(ref factors) = analysis.environmental_factors {
        println!("Environment:    {}", factors);
    }
    println!("Proof hash:     {}", outcome.evidence_hash);
    if outcome.from_cache {
        println!("(cached provider results)");
    }

    match outcome.violation {
        Some(ref record) => print_violation(record),
        None => {
            println!("\nNo violation recorded.");
        }
    }

    Ok(())
}

fn print_violation(record: &ViolationRecord) {
    println!("\nVIOLATION RECORDED");
    println!("==================");
    println!("Violation ID:   {}", record.violation_id);
    println!("Vehicle number: {}", record.vehicle_number);
    println!("Penalty:        {}", record.penalty);
    println!("Location:       {}", record.location);
    println!("Timestamp:      {}", record.timestamp);
    println!("Status:         {}", record.status);
    println!("Reasoning:");
    for line in &record.ai_reasoning {
        println!("  - {}", line);
    }
}

/// Print the violation log in the requested format
pub fn output_history(output_format: OutputFormat, records: &[ViolationRecord]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No violations recorded.");
        return Ok(());
    }

    println!(
        "{:<14} {:<14} {:<10} {:>8} {:>7} {:<10} {:<8} {}",
        "ID", "Plate", "Severity", "Opacity", "Conf", "Penalty", "Status", "Timestamp"
    );
    println!("{}", "-".repeat(92));

    for record in records {
        println!(
            "{:<14} {:<14} {:<10} {:>7.0}% {:>6.0}% {:<10} {:<8} {}",
            record.violation_id,
            record.vehicle_number,
            record.smoke_severity.label(),
            record.smoke_score * 100.0,
            record.ai_confidence,
            record.penalty,
            record.status.label(),
            record.timestamp
        );
    }

    Ok(())
}
