use crate::infra::{parse_strategy, InMemoryEscalationNotifier, InMemorySessionRepository};
use clap::Args;
use serde_json::json;
use std::sync::Arc;
use triage_ai::error::AppError;
use triage_ai::triage::{
    AnswerValue, ChoiceAnswer, ConditionTag, ExternalAnalysis, QuestionBank, ScoringStrategy,
    TriageService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Scoring strategy for the final assessment (weighted_keyword or yes_ratio)
    #[arg(long, value_parser = parse_strategy)]
    pub(crate) strategy: Option<ScoringStrategy>,
    /// Declared medical-history tags expanding the question set (repeatable)
    #[arg(long = "history")]
    pub(crate) history: Vec<String>,
    /// Answer yes to every question to walk the escalation path
    #[arg(long)]
    pub(crate) severe: bool,
    /// Skip the external model sanitization portion of the demo
    #[arg(long)]
    pub(crate) skip_external: bool,
}

fn scripted_answer(question_id: &str, severe: bool) -> AnswerValue {
    if severe {
        return AnswerValue::Choice(ChoiceAnswer::Yes);
    }
    match question_id {
        "q1" | "q1_followup" => AnswerValue::Choice(ChoiceAnswer::Yes),
        "hd2" | "d2" => AnswerValue::Choice(ChoiceAnswer::Unsure),
        _ => AnswerValue::Choice(ChoiceAnswer::No),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        strategy,
        history,
        severe,
        skip_external,
    } = args;

    println!("Triage scoring demo");

    let repository = Arc::new(InMemorySessionRepository::default());
    let notifier = Arc::new(InMemoryEscalationNotifier::default());
    let mut service = TriageService::new(
        repository.clone(),
        notifier.clone(),
        QuestionBank::standard(),
    );
    if let Some(strategy) = strategy {
        service = service.with_default_strategy(strategy);
    }
    let strategy_label = service.default_strategy().label();

    let history: Vec<ConditionTag> = history.into_iter().map(ConditionTag::new).collect();
    if history.is_empty() {
        println!("Medical history: none declared");
    } else {
        let tags: Vec<&str> = history.iter().map(|tag| tag.0.as_str()).collect();
        println!("Medical history: {}", tags.join(", "));
    }

    let record = service.start_session(history).map_err(AppError::from)?;
    let session_id = record.session_id.clone();
    println!(
        "- Opened session {} -> status {}",
        session_id,
        record.status.label()
    );

    println!("\nInterview transcript");
    loop {
        let record = service.get(&session_id).map_err(AppError::from)?;
        let Some(question) = record.session.next_question() else {
            break;
        };
        let answer = scripted_answer(&question.id.0, severe);
        let answer_label = match &answer {
            AnswerValue::Choice(choice) => choice.label().to_string(),
            AnswerValue::Text(text) => text.clone(),
        };
        println!("  Q: {}", question.text);
        println!("  A: {answer_label}");
        service
            .record_answer(&session_id, question.id, answer)
            .map_err(AppError::from)?;
    }

    let assessment = service
        .finalize(&session_id, None)
        .map_err(AppError::from)?;
    println!("\nAssessment ({strategy_label})");
    match serde_json::to_string_pretty(&assessment) {
        Ok(payload) => println!("{payload}"),
        Err(err) => println!("  Assessment payload unavailable: {err}"),
    }

    let events = notifier.events();
    if events.is_empty() {
        println!("\nEscalations: none dispatched");
    } else {
        println!("\nEscalations");
        for event in events {
            println!(
                "  - session {} escalated at score {} ({})",
                event.session_id,
                event.risk_score,
                event.priority.label()
            );
        }
    }

    if skip_external {
        return Ok(());
    }

    // A deliberately messy payload: score out of range, unknown priority,
    // missing advice. Sanitization substitutes defaults field by field.
    println!("\nExternal model sanitization demo");
    let raw_model_output = json!({
        "initialAssessment": "Patient likely needs prompt evaluation.",
        "followUpQuestions": ["When did the symptoms start?"],
        "riskScore": 27,
        "priority": "critical",
        "recommendedAction": "Go to the emergency department"
    });
    let sanitized = ExternalAnalysis::from_model_output(&raw_model_output);
    match serde_json::to_string_pretty(&sanitized) {
        Ok(payload) => println!("{payload}"),
        Err(err) => println!("  Sanitized payload unavailable: {err}"),
    }

    Ok(())
}
