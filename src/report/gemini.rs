use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{REPORT_ENDPOINT, REPORT_MODEL, REPORT_TIMEOUT_MS};
use crate::error::ReportError;
use crate::report::{ReportSource, SimulationReport};
use crate::simulation::SimulationParams;

/// Connection settings for the report service
#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: REPORT_ENDPOINT.to_string(),
            model: REPORT_MODEL.to_string(),
            timeout: Duration::from_millis(REPORT_TIMEOUT_MS),
        }
    }
}

impl ReportConfig {
    /// Read settings from the environment.
    ///
    /// `GEMINI_API_KEY` (or `API_KEY`), `SEISMOGEN_REPORT_ENDPOINT`,
    /// `SEISMOGEN_REPORT_MODEL`, `SEISMOGEN_REPORT_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout = match non_empty("SEISMOGEN_REPORT_TIMEOUT_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    log::warn!("Ignoring invalid SEISMOGEN_REPORT_TIMEOUT_MS: {}", raw);
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            endpoint: non_empty("SEISMOGEN_REPORT_ENDPOINT").unwrap_or(defaults.endpoint),
            model: non_empty("SEISMOGEN_REPORT_MODEL").unwrap_or(defaults.model),
            timeout,
        }
    }
}

/// Blocking client for the `generateContent` endpoint
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    config: ReportConfig,
}

impl GeminiClient {
    pub fn new(config: ReportConfig) -> Result<Self, ReportError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl ReportSource for GeminiClient {
    fn fetch(&self, params: &SimulationParams) -> Result<SimulationReport, ReportError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ReportError::MissingApiKey)?;

        log::debug!("Requesting impact report from {}", self.config.model);
        let response = self
            .http
            .post(self.url())
            .query(&[("key", api_key)])
            .json(&request_body(params))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status(status.as_u16()));
        }

        parse_response(&response.text()?)
    }
}

/// Scenario prompt sent to the model
pub fn build_prompt(params: &SimulationParams) -> String {
    format!(
        "Generate a realistic earthquake impact report.\n\
         \n\
         Scenario Data:\n\
         - Magnitude: {:.1} (Richter Scale)\n\
         - Depth: {} km\n\
         - Setting: {}\n\
         \n\
         The report should be scientific yet accessible, acting as an immediate geological survey summary.\n\
         If the magnitude is very low (< 3.0), describe it as mostly unnoticed.\n\
         If it is extreme (> 8.0), describe catastrophic consequences.",
        params.magnitude(),
        params.depth(),
        params.location_type(),
    )
}

/// JSON schema the model must answer with
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "headline": {
                "type": "STRING",
                "description": "Breaking news style headline"
            },
            "description": {
                "type": "STRING",
                "description": "A detailed paragraph describing the physical sensation and immediate environmental impact."
            },
            "intensityMercalli": {
                "type": "STRING",
                "description": "Estimated Modified Mercalli Intensity (e.g., 'IV', 'IX')"
            },
            "safetyTips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 specific safety instructions for this specific scenario"
            },
            "estimatedDamageCost": {
                "type": "STRING",
                "description": "Rough estimate of economic impact (e.g., 'Minimal', '$100M', '$50B')"
            },
            "affectedPopulationEstimate": {
                "type": "STRING",
                "description": "Estimate of people feeling the shake (e.g., 'None', '500,000', '10 Million')"
            }
        },
        "required": [
            "headline",
            "description",
            "intensityMercalli",
            "safetyTips",
            "estimatedDamageCost",
            "affectedPopulationEstimate"
        ]
    })
}

fn request_body(params: &SimulationParams) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": build_prompt(params) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Pull the report out of a `generateContent` response body
pub fn parse_response(body: &str) -> Result<SimulationReport, ReportError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(ReportError::EmptyPayload)?;

    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::request_report;
    use crate::simulation::{Epicenter, LocationType};

    fn wrap(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        })
        .to_string()
    }

    const REPORT_JSON: &str = r#"{
        "headline": "Coastal Region Jolted",
        "description": "Moderate shaking along the shore.",
        "intensityMercalli": "VI",
        "safetyTips": ["Move to higher ground", "Check gas lines", "Expect aftershocks"],
        "estimatedDamageCost": "$100M",
        "affectedPopulationEstimate": "500,000"
    }"#;

    #[test]
    fn test_parse_nested_report() {
        let report = parse_response(&wrap(REPORT_JSON)).unwrap();
        assert_eq!(report.headline, "Coastal Region Jolted");
        assert_eq!(report.intensity_mercalli, "VI");
        assert_eq!(report.safety_tips.len(), 3);
        assert_eq!(report.affected_population_estimate, "500,000");
    }

    #[test]
    fn test_tip_count_not_enforced() {
        let text = REPORT_JSON.replace(
            r#"["Move to higher ground", "Check gas lines", "Expect aftershocks"]"#,
            r#"["Stay calm"]"#,
        );
        let report = parse_response(&wrap(&text)).unwrap();
        assert_eq!(report.safety_tips, vec!["Stay calm".to_string()]);
    }

    #[test]
    fn test_missing_text_is_empty_payload() {
        let err = parse_response(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, ReportError::EmptyPayload));

        let err = parse_response(&wrap("   ")).unwrap_err();
        assert!(matches!(err, ReportError::EmptyPayload));

        let err = parse_response("{}").unwrap_err();
        assert!(matches!(err, ReportError::EmptyPayload));
    }

    #[test]
    fn test_malformed_report_json() {
        let err = parse_response(&wrap("{\"headline\": \"only\"}")).unwrap_err();
        assert!(matches!(err, ReportError::Malformed(_)));

        let err = parse_response("not json").unwrap_err();
        assert!(matches!(err, ReportError::Malformed(_)));
    }

    #[test]
    fn test_prompt_mentions_scenario() {
        let params = SimulationParams::new(7.2, 35.0, LocationType::CoastalRegion, Epicenter::default());
        let prompt = build_prompt(&params);
        assert!(prompt.contains("Magnitude: 7.2 (Richter Scale)"));
        assert!(prompt.contains("Depth: 35 km"));
        assert!(prompt.contains("Setting: Coastal Region"));
    }

    #[test]
    fn test_request_body_requires_all_fields() {
        let body = request_body(&SimulationParams::default());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let required = body["generationConfig"]["responseSchema"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 6);
    }

    #[test]
    fn test_missing_api_key_falls_back_without_network() {
        let client = GeminiClient::new(ReportConfig::default()).unwrap();
        let report = request_report(&client, &SimulationParams::default());
        assert_eq!(report, SimulationReport::fallback());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = ReportConfig::from_lookup(|name| match name {
            "API_KEY" => Some("secret".to_string()),
            "GEMINI_API_KEY" => Some("".to_string()),
            "SEISMOGEN_REPORT_TIMEOUT_MS" => Some("1500".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.model, REPORT_MODEL);
        assert_eq!(config.endpoint, REPORT_ENDPOINT);
    }

    #[test]
    fn test_config_ignores_bad_timeout() {
        let config = ReportConfig::from_lookup(|name| match name {
            "SEISMOGEN_REPORT_TIMEOUT_MS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config.timeout, Duration::from_millis(REPORT_TIMEOUT_MS));
        assert!(config.api_key.is_none());
    }
}
