//! Vision prompts for emission analysis

/// Core analysis prompt sent alongside the vehicle frame
pub const ANALYSIS_PROMPT: &str = r#"Analyze this vehicle image for emission monitoring. Identify:
1. Vehicle Type (Car, Bus, Truck, Motorcycle)
2. Vehicle Color
3. Smoke/Emission Severity (Low, Moderate, High)
4. Numerical Smoke Score (0.0 to 1.0)
5. Confidence Level (0 to 100)
6. Maintenance Tip: Based on the smoke color (Black, White, Blue/Gray), suggest what engine component might be failing (e.g., fuel injector, head gasket, oil leak).
7. Environmental factors.

Respond with a single JSON object using exactly these keys:
vehicleType, vehicleColor, smokeSeverity, smokeScore, confidence, description, environmentalFactors, maintenanceTip.
smokeSeverity must be one of "Low", "Moderate", "High"."#;

/// Build the analysis prompt for a single frame
pub fn build_analysis_prompt() -> String {
    ANALYSIS_PROMPT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_every_response_key() {
        let prompt = build_analysis_prompt();
        for key in [
            "vehicleType",
            "vehicleColor",
            "smokeSeverity",
            "smokeScore",
            "confidence",
            "description",
            "maintenanceTip",
        ] {
            assert!(prompt.contains(key), "prompt is missing key {}", key);
        }
    }
}
