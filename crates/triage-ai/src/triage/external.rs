//! Typed sanitization for assessments produced by an external language
//! model. The deterministic scorer never depends on this path; it exists so
//! callers that do consult a model can parse its JSON into a typed value
//! with per-field fallbacks instead of trusting the payload shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::Priority;

const MIN_RISK_SCORE: u8 = 1;
const MAX_RISK_SCORE: u8 = 10;

const DEFAULT_INITIAL_ASSESSMENT: &str =
    "Based on the information provided, a basic health assessment will be conducted.";
const DEFAULT_RECOMMENDED_ACTION: &str =
    "Please complete the assessment questions for a more accurate evaluation.";
const DEFAULT_PERSONALIZED_ADVICE: &str =
    "Answer all questions honestly for the most accurate assessment.";
const DEGRADED_INITIAL_ASSESSMENT: &str =
    "We're experiencing technical difficulties. Here's a general assessment based on standard guidelines.";
const DEGRADED_PERSONALIZED_ADVICE: &str =
    "As we couldn't process your specific information, please consult with a healthcare provider for personalized advice.";

const DEFAULT_FOLLOW_UP_QUESTIONS: [&str; 4] = [
    "Are you experiencing any severe pain?",
    "Have you noticed any changes in your symptoms recently?",
    "Do you have any pre-existing medical conditions?",
    "Are you currently taking any medications?",
];

/// Risk-factor summary reported by the external model. Unreported factors
/// stay `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub pain_level: String,
    pub bleeding: String,
    pub fever: String,
    pub chronic_conditions: String,
}

impl Default for RiskFactors {
    fn default() -> Self {
        Self {
            pain_level: "unknown".to_string(),
            bleeding: "unknown".to_string(),
            fever: "unknown".to_string(),
            chronic_conditions: "unknown".to_string(),
        }
    }
}

/// External model assessment after field-by-field sanitization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalAnalysis {
    pub initial_assessment: String,
    pub follow_up_questions: Vec<String>,
    pub risk_factors: RiskFactors,
    pub risk_score: u8,
    pub priority: Priority,
    pub recommended_action: String,
    pub personalized_advice: String,
}

impl Default for ExternalAnalysis {
    fn default() -> Self {
        Self {
            initial_assessment: DEFAULT_INITIAL_ASSESSMENT.to_string(),
            follow_up_questions: DEFAULT_FOLLOW_UP_QUESTIONS
                .iter()
                .map(|question| question.to_string())
                .collect(),
            risk_factors: RiskFactors::default(),
            risk_score: MIN_RISK_SCORE,
            priority: Priority::Low,
            recommended_action: DEFAULT_RECOMMENDED_ACTION.to_string(),
            personalized_advice: DEFAULT_PERSONALIZED_ADVICE.to_string(),
        }
    }
}

impl ExternalAnalysis {
    /// Parse an untrusted model payload. Every field is validated on its
    /// own and replaced by its default when missing or malformed; a payload
    /// that is not even a JSON object yields the full default analysis.
    pub fn from_model_output(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(object) = value.as_object() else {
            return defaults;
        };

        let risk_factors = object
            .get("riskFactors")
            .map(|factors| RiskFactors {
                pain_level: string_field(factors, "painLevel"),
                bleeding: string_field(factors, "bleeding"),
                fever: string_field(factors, "fever"),
                chronic_conditions: string_field(factors, "chronicConditions"),
            })
            .unwrap_or_default();

        let risk_score = object
            .get("riskScore")
            .and_then(Value::as_f64)
            .map(|score| score.clamp(f64::from(MIN_RISK_SCORE), f64::from(MAX_RISK_SCORE)) as u8)
            .unwrap_or(defaults.risk_score);

        let priority = object
            .get("priority")
            .and_then(Value::as_str)
            .and_then(parse_priority)
            .unwrap_or(defaults.priority);

        let follow_up_questions = object
            .get("followUpQuestions")
            .and_then(Value::as_array)
            .map(|questions| {
                questions
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|questions| !questions.is_empty())
            .unwrap_or(defaults.follow_up_questions);

        Self {
            initial_assessment: non_empty(object, "initialAssessment", defaults.initial_assessment),
            follow_up_questions,
            risk_factors,
            risk_score,
            priority,
            recommended_action: non_empty(
                object,
                "recommendedAction",
                defaults.recommended_action,
            ),
            personalized_advice: non_empty(
                object,
                "personalizedAdvice",
                defaults.personalized_advice,
            ),
        }
    }

    /// Fallback analysis surfaced when the external model call failed
    /// outright, never a fabricated deterministic score.
    pub fn degraded() -> Self {
        Self {
            initial_assessment: DEGRADED_INITIAL_ASSESSMENT.to_string(),
            personalized_advice: DEGRADED_PERSONALIZED_ADVICE.to_string(),
            ..Self::default()
        }
    }
}

fn parse_priority(raw: &str) -> Option<Priority> {
    match raw {
        "high" => Some(Priority::High),
        "moderate" => Some(Priority::Moderate),
        "low" => Some(Priority::Low),
        _ => None,
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|raw| !raw.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

fn non_empty(object: &serde_json::Map<String, Value>, key: &str, fallback: String) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
        .unwrap_or(fallback)
}
