use crate::infra::submission_sink;
use brand_audit::config::AppConfig;
use brand_audit::error::AppError;
use brand_audit::workflows::audit::sessions::SessionError;
use brand_audit::workflows::audit::{
    contact_links, present, AssessmentAnswers, AuditWizard, ContactLinks, NotificationQueue,
    ResultsPresentation, ScoredAssessment, SubmissionOutcome, WizardTransition,
};
use chrono::Local;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON answer set (snake_case keys, e.g. {"name": "Jane", "design_quality": 8})
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Email the completed assessment and wait for the outcome
    #[arg(long)]
    pub(crate) submit: bool,
    /// Print the results as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct AssessmentReport<'a> {
    results: &'a ResultsPresentation,
    contact_links: &'a ContactLinks,
}

pub(crate) async fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        submit,
        json,
    } = args;

    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&answers)?;
    let parsed: AssessmentAnswers = serde_json::from_str(&raw)
        .map_err(|err| AppError::Input(format!("{}: {err}", answers.display())))?;

    let scored = complete_assessment(parsed)?;
    let presentation = present(&scored);
    let links = contact_links(&config.contact, scored.score);

    if json {
        let report = AssessmentReport {
            results: &presentation,
            contact_links: &links,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Results payload unavailable: {err}"),
        }
    } else {
        render_results(&presentation, &links);
    }

    if !submit {
        return Ok(());
    }

    println!("\nSubmitting assessment by email...");
    let queue = NotificationQueue::default();
    let handle = submission_sink(&config)?.dispatch(&scored, Arc::new(queue.clone()));
    let outcome = handle
        .await
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))?;

    for notice in queue.drain() {
        println!("- {}: {}", notice.title, notice.description);
    }
    match outcome {
        SubmissionOutcome::Delivered(receipt) => {
            println!("  Email service responded {} {}", receipt.status, receipt.text);
        }
        SubmissionOutcome::Failed(err) => println!("  Submission not delivered: {err}"),
    }

    Ok(())
}

/// Drive a fresh wizard through every step with the supplied answers.
pub(crate) fn complete_assessment(answers: AssessmentAnswers) -> Result<ScoredAssessment, AppError> {
    let mut wizard = AuditWizard::with_answers(answers);
    loop {
        match wizard.next().map_err(SessionError::from)? {
            WizardTransition::Advanced(_) => continue,
            WizardTransition::Blocked(errors) => {
                let detail = errors
                    .iter()
                    .map(|(field, message)| format!("{}: {message}", field.template_key()))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(AppError::Input(detail));
            }
            WizardTransition::Completed(scored) => return Ok(*scored),
        }
    }
}

fn render_results(presentation: &ResultsPresentation, links: &ContactLinks) {
    println!("Your Brand Audit Score: {}%", presentation.score);
    if presentation.exceeds_scale {
        println!("  (score is above the nominal 100 point scale)");
    }
    println!(
        "Completed {}",
        presentation
            .completed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );

    let recommendation = &presentation.recommendation;
    println!("\n{} [{}]", recommendation.title, recommendation.action);
    println!("  {}", recommendation.description);

    println!("\nDetailed breakdown");
    for row in &presentation.categories {
        println!("  - {:<20} {:>3}%", row.name, row.score);
    }

    let summary = &presentation.summary;
    println!("\nBusiness summary");
    println!("  Business type: {}", summary.business_type);
    println!("  Website: {}", summary.website);
    println!("  Current brand: {}", summary.current_brand);
    println!("  Marketing budget: {}", summary.marketing_budget);
    println!("  Active platforms: {}", summary.platforms.join(", "));
    if let Some(info) = &summary.additional_info {
        println!("  Additional information: {info}");
    }

    let pitch = &presentation.contact;
    println!("\n{}", pitch.title);
    println!("  {}", pitch.message);
    println!("  {}", pitch.call_to_action);
    println!("  Call: {}", links.phone);
    println!("  WhatsApp: {}", links.whatsapp);
    println!("  Email: {}", links.email);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane_answers() -> AssessmentAnswers {
        serde_json::from_value(serde_json::json!({
            "name": "Jane",
            "email": "jane@x.com",
            "contact": "+1 (415) 555-1234",
            "design_quality": 8,
            "communication_clarity": 7,
            "strategy_alignment": 9,
            "marketing_budget": "1000-5000",
            "platforms_used": ["Website", "Instagram"]
        }))
        .expect("answers deserialize")
    }

    #[test]
    fn complete_assessment_scores_the_answer_set() {
        let scored = complete_assessment(jane_answers()).expect("valid answers");
        assert_eq!(scored.score, 104);
        assert_eq!(scored.answers.name, "Jane");
    }

    #[test]
    fn complete_assessment_reports_identity_errors() {
        let mut answers = jane_answers();
        answers.email = "a@b".to_string();
        answers.name.clear();

        match complete_assessment(answers) {
            Err(AppError::Input(detail)) => {
                assert!(detail.contains("name: Name is required"));
                assert!(detail.contains("email: Please enter a valid email address"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn out_of_range_ratings_fail_to_parse() {
        let parsed = serde_json::from_value::<AssessmentAnswers>(serde_json::json!({
            "design_quality": 11
        }));
        assert!(parsed.is_err());
    }
}
