mod keywords;
mod ratio;
mod templates;

use serde::{Deserialize, Serialize};

use super::domain::{Assessment, Question, Response};

/// Risk scores at or above this value are high priority in both strategies.
pub(crate) const HIGH_RISK_THRESHOLD: u8 = 7;

/// Named scoring strategies. The two are deliberately not equivalent (they
/// disagree on bounds and on whether a moderate tier exists), so callers
/// select one explicitly and the scorer never unifies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Weighted sum over the response count: categorical answers contribute
    /// their configured option weight, free text contributes summed risk
    /// vocabulary matches. Scores land in `[0, 10]`; no moderate tier.
    WeightedKeyword,
    /// Share of literal yes answers scaled to `[1, 10]` with a three-way
    /// tier split.
    YesRatio,
}

impl ScoringStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            ScoringStrategy::WeightedKeyword => "weighted_keyword",
            ScoringStrategy::YesRatio => "yes_ratio",
        }
    }
}

/// Error raised when scoring preconditions are violated.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("cannot score an empty response set")]
    EmptyResponseSet,
}

/// Stateless scorer mapping a response set to an immutable assessment.
#[derive(Debug, Clone, Copy)]
pub struct RiskScorer {
    strategy: ScoringStrategy,
}

impl RiskScorer {
    pub fn new(strategy: ScoringStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.strategy
    }

    /// Score a completed response set against the questions it answered.
    ///
    /// Malformed free text never fails scoring; unmatched vocabulary simply
    /// contributes zero.
    pub fn score(
        &self,
        questions: &[Question],
        responses: &[Response],
    ) -> Result<Assessment, ScoringError> {
        if responses.is_empty() {
            return Err(ScoringError::EmptyResponseSet);
        }

        let (risk_score, priority) = match self.strategy {
            ScoringStrategy::WeightedKeyword => {
                let score = keywords::score(questions, responses);
                (score, keywords::tier(score))
            }
            ScoringStrategy::YesRatio => {
                let score = ratio::score(responses);
                (score, ratio::tier(score))
            }
        };

        Ok(Assessment {
            risk_score,
            priority,
            explanation: templates::explanation(priority).to_string(),
            recommended_action: templates::recommended_action(priority, self.strategy).to_string(),
        })
    }
}
