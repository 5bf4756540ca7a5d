use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for triage questions, unique within a question set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for interactive triage sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared pre-existing condition tag (e.g. "diabetes", "heart_disease").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConditionTag(pub String);

impl ConditionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

/// Point values for the three categorical answer options.
///
/// `no` carries zero weight in every shipped question set, but arbitrary
/// non-negative values are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerWeights {
    pub yes: f64,
    pub no: f64,
    pub unsure: f64,
}

impl AnswerWeights {
    pub fn for_choice(&self, choice: ChoiceAnswer) -> f64 {
        match choice {
            ChoiceAnswer::Yes => self.yes,
            ChoiceAnswer::No => self.no,
            ChoiceAnswer::Unsure => self.unsure,
        }
    }

    pub(crate) fn entries(&self) -> [(&'static str, f64); 3] {
        [("yes", self.yes), ("no", self.no), ("unsure", self.unsure)]
    }
}

/// How a question is answered: fixed yes/no/unsure options with per-option
/// weights, or free text scanned for risk vocabulary at scoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    YesNoUnsure { weights: AnswerWeights },
    FreeText,
}

/// A single triage prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn yes_no_unsure(
        id: impl Into<String>,
        text: impl Into<String>,
        weights: AnswerWeights,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            kind: QuestionKind::YesNoUnsure { weights },
        }
    }

    pub fn free_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            kind: QuestionKind::FreeText,
        }
    }
}

/// Fixed-choice answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceAnswer {
    Yes,
    No,
    Unsure,
}

impl ChoiceAnswer {
    pub const fn label(self) -> &'static str {
        match self {
            ChoiceAnswer::Yes => "yes",
            ChoiceAnswer::No => "no",
            ChoiceAnswer::Unsure => "unsure",
        }
    }
}

/// Answer payload: a fixed choice, or free text.
///
/// Deserialization tries the categorical options first, so `"yes"` arrives
/// as [`ChoiceAnswer::Yes`] while any other string stays free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(ChoiceAnswer),
    Text(String),
}

impl AnswerValue {
    /// Whether this answer counts toward the yes-ratio tally. Free text
    /// only counts when it is exactly the literal `yes`.
    pub fn is_yes(&self) -> bool {
        match self {
            AnswerValue::Choice(choice) => *choice == ChoiceAnswer::Yes,
            AnswerValue::Text(text) => text == "yes",
        }
    }
}

/// A recorded answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: QuestionId,
    pub answer: AnswerValue,
}

impl Response {
    pub fn new(question_id: impl Into<String>, answer: AnswerValue) -> Self {
        Self {
            question_id: QuestionId::new(question_id),
            answer,
        }
    }
}

/// Priority tier attached to a finished assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Moderate,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Moderate => "moderate",
            Priority::Low => "low",
        }
    }
}

/// Immutable scoring output. Recomputing from the same response set under
/// the same strategy always yields an identical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub risk_score: u8,
    pub priority: Priority,
    pub explanation: String,
    pub recommended_action: String,
}

/// High level status tracked throughout an interactive triage session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriageStatus {
    InProgress,
    Assessed,
}

impl TriageStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TriageStatus::InProgress => "in_progress",
            TriageStatus::Assessed => "assessed",
        }
    }
}
