use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{
    AnswerValue, AnswerWeights, ChoiceAnswer, ConditionTag, Question, QuestionId, QuestionKind,
    Response,
};

/// Error raised while assembling a question bank.
#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("question '{question_id}' weight entry '{entry}' must be a non-negative finite number")]
    InvalidWeightConfiguration {
        question_id: QuestionId,
        entry: &'static str,
    },
}

/// Appends one extra question once a specific `(question, answer)` pair has
/// been recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRule {
    pub question_id: QuestionId,
    pub answer: AnswerValue,
    pub question: Question,
}

impl FollowUpRule {
    pub fn on_yes(question_id: impl Into<String>, question: Question) -> Self {
        Self {
            question_id: QuestionId::new(question_id),
            answer: AnswerValue::Choice(ChoiceAnswer::Yes),
            question,
        }
    }

    fn matches(&self, response: &Response) -> bool {
        self.question_id == response.question_id && self.answer == response.answer
    }
}

/// Condition-specific additions selected by declared medical history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    pub trigger_condition_id: ConditionTag,
    pub extra_questions: Vec<Question>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUpRule>,
}

impl ConditionRule {
    pub fn new(tag: impl Into<String>, extra_questions: Vec<Question>) -> Self {
        Self {
            trigger_condition_id: ConditionTag::new(tag),
            extra_questions,
            follow_ups: Vec::new(),
        }
    }
}

/// Fixed and conditional triage questions with pure active-set assembly.
///
/// Weight configurations are validated up front so scoring never has to
/// deal with a malformed question.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    base_questions: Vec<Question>,
    condition_rules: Vec<ConditionRule>,
    follow_ups: Vec<FollowUpRule>,
}

impl QuestionBank {
    pub fn new(
        base_questions: Vec<Question>,
        condition_rules: Vec<ConditionRule>,
        follow_ups: Vec<FollowUpRule>,
    ) -> Result<Self, QuestionBankError> {
        for question in &base_questions {
            validate_weights(question)?;
        }
        for rule in &condition_rules {
            for question in &rule.extra_questions {
                validate_weights(question)?;
            }
            for follow_up in &rule.follow_ups {
                validate_weights(&follow_up.question)?;
            }
        }
        for follow_up in &follow_ups {
            validate_weights(&follow_up.question)?;
        }

        Ok(Self {
            base_questions,
            condition_rules,
            follow_ups,
        })
    }

    /// The production question set: five general screening questions,
    /// condition-specific additions for heart disease and diabetes, and
    /// answer-driven severity follow-ups.
    pub fn standard() -> Self {
        let base_questions = vec![
            Question::yes_no_unsure("q1", "Are you experiencing chest pain?", graded(3.0)),
            Question::yes_no_unsure("q2", "Do you have a fever?", graded(2.0)),
            Question::yes_no_unsure("q3", "Are you having difficulty breathing?", graded(3.0)),
            Question::yes_no_unsure("q4", "Do you have a severe headache?", graded(2.0)),
            Question::yes_no_unsure(
                "q5",
                "Have you experienced sudden weakness or numbness?",
                graded(3.0),
            ),
        ];

        let condition_rules = vec![
            ConditionRule::new(
                "heart_disease",
                vec![
                    Question::yes_no_unsure(
                        "hd1",
                        "Have you experienced shortness of breath?",
                        graded(2.0),
                    ),
                    Question::yes_no_unsure(
                        "hd2",
                        "Do you have swelling in your legs or ankles?",
                        graded(1.0),
                    ),
                ],
            ),
            ConditionRule::new(
                "diabetes",
                vec![
                    Question::yes_no_unsure(
                        "d1",
                        "Have you noticed unusual thirst or frequent urination?",
                        graded(2.0),
                    ),
                    Question::yes_no_unsure(
                        "d2",
                        "Have you experienced unexplained weight loss?",
                        graded(1.0),
                    ),
                ],
            ),
        ];

        let follow_ups = vec![
            FollowUpRule::on_yes(
                "q1",
                Question::yes_no_unsure(
                    "q1_followup",
                    "Is the chest pain severe or getting worse?",
                    graded(2.0),
                ),
            ),
            FollowUpRule::on_yes(
                "q2",
                Question::yes_no_unsure(
                    "q2_followup",
                    "Has your fever lasted more than 3 days?",
                    graded(1.0),
                ),
            ),
        ];

        Self::new(base_questions, condition_rules, follow_ups)
            .expect("standard question set carries valid weights")
    }

    pub fn base_questions(&self) -> &[Question] {
        &self.base_questions
    }

    /// Assemble the ordered active question set for a respondent.
    ///
    /// Base questions come first in declaration order, then the extra
    /// questions of every condition rule whose trigger tag is declared
    /// (rules evaluated in their own declaration order), then matched
    /// follow-ups appended at the tail in response insertion order.
    /// Insertion is idempotent per question id: repeated invocation with
    /// the same inputs returns the same list.
    pub fn active_questions(
        &self,
        history: &BTreeSet<ConditionTag>,
        responses: &[Response],
    ) -> Vec<Question> {
        let mut questions = Vec::with_capacity(self.base_questions.len());
        let mut seen: HashSet<&QuestionId> = HashSet::new();

        for question in &self.base_questions {
            if seen.insert(&question.id) {
                questions.push(question.clone());
            }
        }

        let mut active_follow_ups: Vec<&FollowUpRule> = self.follow_ups.iter().collect();
        for rule in &self.condition_rules {
            // Unknown declared tags match no rule and are silently ignored.
            if !history.contains(&rule.trigger_condition_id) {
                continue;
            }
            for question in &rule.extra_questions {
                if seen.insert(&question.id) {
                    questions.push(question.clone());
                }
            }
            active_follow_ups.extend(rule.follow_ups.iter());
        }

        for response in responses {
            for follow_up in &active_follow_ups {
                if follow_up.matches(response) && seen.insert(&follow_up.question.id) {
                    questions.push(follow_up.question.clone());
                }
            }
        }

        questions
    }
}

fn validate_weights(question: &Question) -> Result<(), QuestionBankError> {
    if let QuestionKind::YesNoUnsure { weights } = &question.kind {
        for (entry, value) in weights.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(QuestionBankError::InvalidWeightConfiguration {
                    question_id: question.id.clone(),
                    entry,
                });
            }
        }
    }
    Ok(())
}

fn graded(yes: f64) -> AnswerWeights {
    AnswerWeights {
        yes,
        no: 0.0,
        unsure: yes / 2.0,
    }
}
