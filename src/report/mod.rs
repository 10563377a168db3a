//! Narrative impact reports.
//!
//! A report comes from a remote generative service (see [`gemini`]). Any
//! failure on the way resolves to [`SimulationReport::fallback`]: callers
//! always get a report value, never an error.

pub mod gemini;
mod worker;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::simulation::SimulationParams;

pub use gemini::{GeminiClient, ReportConfig};
pub use worker::ReportWorker;

/// Impact assessment for one simulated event. All fields are free text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub headline: String,
    pub description: String,
    pub intensity_mercalli: String,
    pub safety_tips: Vec<String>,
    pub estimated_damage_cost: String,
    pub affected_population_estimate: String,
}

impl SimulationReport {
    /// Report shown when the service cannot be reached or answers badly
    pub fn fallback() -> Self {
        Self {
            headline: "Data Unavailable".to_string(),
            description: "Unable to retrieve seismic analysis at this time. Please try again."
                .to_string(),
            intensity_mercalli: "Unknown".to_string(),
            safety_tips: vec!["Drop, Cover, and Hold On".to_string()],
            estimated_damage_cost: "Unknown".to_string(),
            affected_population_estimate: "Unknown".to_string(),
        }
    }
}

/// Text panel for the log
impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IMPACT ASSESSMENT: {}", self.headline)?;
        writeln!(f, "Mercalli Intensity: {}", self.intensity_mercalli)?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        writeln!(f, "Affected Pop.: {}", self.affected_population_estimate)?;
        writeln!(f, "Est. Damage:   {}", self.estimated_damage_cost)?;
        writeln!(f)?;
        write!(f, "CRITICAL SAFETY PROTOCOLS")?;
        for (idx, tip) in self.safety_tips.iter().enumerate() {
            write!(f, "\n  {:02} {}", idx + 1, tip)?;
        }
        Ok(())
    }
}

/// Something that can produce a report for a scenario
pub trait ReportSource: Send + Sync {
    fn fetch(&self, params: &SimulationParams) -> Result<SimulationReport, ReportError>;
}

/// Fetch a report, resolving every failure to the fallback
pub fn request_report(source: &dyn ReportSource, params: &SimulationParams) -> SimulationReport {
    match source.fetch(params) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Error generating report: {}", e);
            SimulationReport::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl ReportSource for Unreachable {
        fn fetch(&self, _params: &SimulationParams) -> Result<SimulationReport, ReportError> {
            Err(ReportError::Status(503))
        }
    }

    struct Canned(SimulationReport);

    impl ReportSource for Canned {
        fn fetch(&self, _params: &SimulationParams) -> Result<SimulationReport, ReportError> {
            Ok(self.0.clone())
        }
    }

    fn sample_report() -> SimulationReport {
        SimulationReport {
            headline: "Strong Quake Rattles City".to_string(),
            description: "Buildings swayed for several seconds.".to_string(),
            intensity_mercalli: "VII".to_string(),
            safety_tips: vec![
                "Drop to the ground".to_string(),
                "Stay away from windows".to_string(),
                "Expect aftershocks".to_string(),
            ],
            estimated_damage_cost: "$2B".to_string(),
            affected_population_estimate: "3 Million".to_string(),
        }
    }

    #[test]
    fn test_failure_yields_exact_fallback() {
        let report = request_report(&Unreachable, &SimulationParams::default());
        assert_eq!(report.headline, "Data Unavailable");
        assert_eq!(
            report.description,
            "Unable to retrieve seismic analysis at this time. Please try again."
        );
        assert_eq!(report.intensity_mercalli, "Unknown");
        assert_eq!(report.safety_tips, vec!["Drop, Cover, and Hold On".to_string()]);
        assert_eq!(report.estimated_damage_cost, "Unknown");
        assert_eq!(report.affected_population_estimate, "Unknown");
        assert_eq!(report, SimulationReport::fallback());
    }

    #[test]
    fn test_success_passes_through() {
        let report = request_report(&Canned(sample_report()), &SimulationParams::default());
        assert_eq!(report, sample_report());
    }

    #[test]
    fn test_camel_case_fields() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["intensityMercalli"], "VII");
        assert_eq!(json["safetyTips"][2], "Expect aftershocks");
        assert_eq!(json["estimatedDamageCost"], "$2B");
        assert_eq!(json["affectedPopulationEstimate"], "3 Million");
    }

    #[test]
    fn test_text_panel_numbers_tips() {
        let text = sample_report().to_string();
        assert!(text.starts_with("IMPACT ASSESSMENT: Strong Quake Rattles City"));
        assert!(text.contains("Mercalli Intensity: VII"));
        assert!(text.contains("  01 Drop to the ground"));
        assert!(text.contains("  03 Expect aftershocks"));
    }
}
