//! Read-only projection of a finished assessment for the results screen.

mod tiers;
pub mod views;

pub use tiers::{ContactPitch, RecommendationTier};
pub use views::{BusinessSummary, CategoryRow, RecommendationView, ResultsPresentation};

use super::domain::{AssessmentAnswers, ScoredAssessment};
use super::scoring::{ScoreDimension, NOMINAL_MAX};

const FULL_MARKS: u16 = 100;
const RATING_ROW_SCALE: u16 = 10;

pub fn present(assessment: &ScoredAssessment) -> ResultsPresentation {
    let tier = RecommendationTier::for_score(assessment.score);

    ResultsPresentation {
        score: assessment.score,
        exceeds_scale: assessment.score > NOMINAL_MAX,
        recommendation: tier.into(),
        categories: category_rows(&assessment.answers),
        contact: tier.contact_pitch(),
        summary: business_summary(&assessment.answers),
        completed_at: assessment.completed_at,
    }
}

/// Per-category display percentages. These are computed independently of the scoring weights.
pub fn category_rows(answers: &AssessmentAnswers) -> Vec<CategoryRow> {
    ScoreDimension::ordered()
        .into_iter()
        .map(|dimension| {
            let score = match dimension {
                ScoreDimension::Design => {
                    u16::from(answers.design_quality.value()) * RATING_ROW_SCALE
                }
                ScoreDimension::Communication => {
                    u16::from(answers.communication_clarity.value()) * RATING_ROW_SCALE
                }
                ScoreDimension::Strategy => {
                    u16::from(answers.strategy_alignment.value()) * RATING_ROW_SCALE
                }
                ScoreDimension::MarketingBudget => {
                    if answers.marketing_budget.is_some() {
                        FULL_MARKS
                    } else {
                        0
                    }
                }
                ScoreDimension::Platforms => {
                    if answers.platforms_used.is_empty() {
                        0
                    } else {
                        FULL_MARKS
                    }
                }
            };
            CategoryRow {
                dimension,
                name: dimension.label(),
                score,
            }
        })
        .collect()
}

pub fn business_summary(answers: &AssessmentAnswers) -> BusinessSummary {
    BusinessSummary {
        business_type: or_fallback(&answers.business_type, "Not specified"),
        website: or_fallback(&answers.website, "Not provided"),
        current_brand: or_fallback(&answers.current_brand, "Not provided"),
        marketing_budget: answers
            .marketing_budget
            .map(|budget| format!("${}", budget.token()))
            .unwrap_or_else(|| "Not specified".to_string()),
        platforms: if answers.platforms_used.is_empty() {
            vec!["None specified".to_string()]
        } else {
            answers
                .platforms_used
                .iter()
                .map(|platform| platform.label().to_string())
                .collect()
        },
        additional_info: Some(answers.additional_info.trim())
            .filter(|info| !info.is_empty())
            .map(str::to_string),
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::audit::domain::{MarketingBudget, Platform, Rating};
    use chrono::Utc;

    fn scored(answers: AssessmentAnswers, score: u16) -> ScoredAssessment {
        ScoredAssessment {
            answers,
            score,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn rating_rows_scale_by_ten() {
        let answers = AssessmentAnswers {
            design_quality: Rating::new(8).expect("valid"),
            communication_clarity: Rating::new(7).expect("valid"),
            strategy_alignment: Rating::new(9).expect("valid"),
            marketing_budget: Some(MarketingBudget::OneToFiveLakh),
            ..AssessmentAnswers::default()
        };
        let rows = category_rows(&answers);

        let scores: Vec<u16> = rows.iter().map(|row| row.score).collect();
        assert_eq!(scores, vec![80, 70, 90, 100, 0]);
        assert_eq!(rows[0].name, "Design Quality");
        assert_eq!(rows[4].name, "Platform Usage");
    }

    #[test]
    fn summary_uses_fallbacks_for_blank_answers() {
        let summary = business_summary(&AssessmentAnswers::default());
        assert_eq!(summary.business_type, "Not specified");
        assert_eq!(summary.website, "Not provided");
        assert_eq!(summary.current_brand, "Not provided");
        assert_eq!(summary.marketing_budget, "Not specified");
        assert_eq!(summary.platforms, vec!["None specified".to_string()]);
        assert!(summary.additional_info.is_none());
    }

    #[test]
    fn presentation_flags_scores_above_the_nominal_scale() {
        let answers = AssessmentAnswers {
            website: "https://shop.example".to_string(),
            marketing_budget: Some(MarketingBudget::UpToOneLakh),
            platforms_used: vec![Platform::Website, Platform::TwitterX],
            ..AssessmentAnswers::default()
        };
        let presentation = present(&scored(answers, 104));

        assert!(presentation.exceeds_scale);
        assert_eq!(presentation.recommendation.tier, RecommendationTier::Growth);
        assert_eq!(presentation.contact.title, "Ready to Scale Your Success?");
        assert_eq!(presentation.summary.marketing_budget, "$0-1000");
        assert_eq!(presentation.summary.platforms, vec!["Website", "Twitter/X"]);
    }

    #[test]
    fn low_scores_get_the_urgent_tier() {
        let presentation = present(&scored(AssessmentAnswers::default(), 52));
        assert!(!presentation.exceeds_scale);
        assert_eq!(presentation.recommendation.action, "urgent");
        assert_eq!(presentation.recommendation.title, "Brand Enhancement Needed");
    }
}
