use super::super::domain::{Priority, Response};
use super::HIGH_RISK_THRESHOLD;

const MODERATE_RISK_THRESHOLD: u8 = 4;
const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;

/// Share of literal yes answers, scaled to ten and clamped into `[1, 10]`.
pub(super) fn score(responses: &[Response]) -> u8 {
    let yes_count = responses
        .iter()
        .filter(|response| response.answer.is_yes())
        .count();
    // Guard against division by zero; callers normally reject empty sets
    // before reaching this point.
    let total_answered = responses.len().max(1);

    let scaled = (yes_count as f64 / total_answered as f64) * MAX_SCORE;
    scaled.clamp(MIN_SCORE, MAX_SCORE).round() as u8
}

pub(super) fn tier(score: u8) -> Priority {
    if score >= HIGH_RISK_THRESHOLD {
        Priority::High
    } else if score >= MODERATE_RISK_THRESHOLD {
        Priority::Moderate
    } else {
        Priority::Low
    }
}
