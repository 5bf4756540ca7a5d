use super::super::domain::{AnswerValue, Priority, Question, QuestionKind, Response};
use super::HIGH_RISK_THRESHOLD;

/// Risk vocabulary applied to free-text answers. Matching is a
/// case-insensitive substring check; each keyword counts once per answer,
/// and a single answer may match several keywords.
const KEYWORD_WEIGHTS: [(&str, f64); 9] = [
    ("severe", 2.0),
    ("pain", 1.5),
    ("chronic", 1.0),
    ("emergency", 2.0),
    ("urgent", 1.5),
    ("mild", 0.5),
    ("moderate", 1.0),
    ("yes", 1.0),
    ("no", 0.0),
];

const SCALE_FACTOR: f64 = 5.0;
const MAX_SCORE: f64 = 10.0;

/// Average points per response, scaled by five and capped at ten.
pub(super) fn score(questions: &[Question], responses: &[Response]) -> u8 {
    let total: f64 = responses
        .iter()
        .map(|response| response_points(questions, response))
        .sum();

    let normalized = ((total / responses.len() as f64) * SCALE_FACTOR).min(MAX_SCORE);
    // f64::round is round-half-away-from-zero, which is round-half-up for
    // the non-negative values produced here.
    normalized.round() as u8
}

pub(super) fn tier(score: u8) -> Priority {
    if score >= HIGH_RISK_THRESHOLD {
        Priority::High
    } else {
        Priority::Low
    }
}

fn response_points(questions: &[Question], response: &Response) -> f64 {
    let question = questions
        .iter()
        .find(|question| question.id == response.question_id);

    match (&response.answer, question.map(|question| &question.kind)) {
        (AnswerValue::Choice(choice), Some(QuestionKind::YesNoUnsure { weights })) => {
            weights.for_choice(*choice)
        }
        // A categorical answer without a configured weight falls back to
        // the vocabulary, where "yes" and "no" carry their legacy points.
        (AnswerValue::Choice(choice), _) => keyword_points(choice.label()),
        (AnswerValue::Text(text), _) => keyword_points(text),
    }
}

fn keyword_points(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    KEYWORD_WEIGHTS
        .iter()
        .filter(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, weight)| weight)
        .sum()
}
