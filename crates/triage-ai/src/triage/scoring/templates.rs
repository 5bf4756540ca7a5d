use super::super::domain::Priority;
use super::ScoringStrategy;

/// Fixed explanation text keyed by priority tier.
pub(super) fn explanation(priority: Priority) -> &'static str {
    match priority {
        Priority::High => {
            "Indicates severe symptoms or critical conditions that require immediate attention."
        }
        Priority::Moderate => {
            "Your symptoms suggest the need for medical evaluation in the near future."
        }
        Priority::Low => {
            "Indicates mild or moderate symptoms that can be addressed through routine care."
        }
    }
}

/// Fixed recommendation text keyed by tier and strategy. The two strategies
/// shipped with different wording and callers depend on the exact strings.
pub(super) fn recommended_action(priority: Priority, strategy: ScoringStrategy) -> &'static str {
    match (priority, strategy) {
        (Priority::High, ScoringStrategy::WeightedKeyword) => "Emergency care is recommended",
        (Priority::High, ScoringStrategy::YesRatio) => "Seek immediate medical attention",
        (Priority::Moderate, _) => "Schedule an appointment soon",
        (Priority::Low, ScoringStrategy::WeightedKeyword) => {
            "Schedule a routine care appointment or diagnostic examination"
        }
        (Priority::Low, ScoringStrategy::YesRatio) => {
            "Monitor your symptoms and utilize AI tools for ongoing assessment."
        }
    }
}
