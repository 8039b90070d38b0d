use serde::{Deserialize, Serialize};

use super::domain::{AssessmentAnswers, Rating};

/// Points per rating step; a 1-10 rating maps onto 20-200 before averaging.
pub const RATING_WEIGHT: u16 = 20;
/// Flat points awarded when a categorical answer is present.
pub const PRESENCE_POINTS: u16 = 20;
/// Number of equally weighted dimensions averaged into the score.
pub const DIMENSION_COUNT: u16 = 5;
/// Nominal top of the published scale. The formula is not capped at this value.
pub const NOMINAL_MAX: u16 = 100;

/// The five equally weighted scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Design,
    Communication,
    Strategy,
    MarketingBudget,
    Platforms,
}

impl ScoreDimension {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Design,
            Self::Communication,
            Self::Strategy,
            Self::MarketingBudget,
            Self::Platforms,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Design => "Design Quality",
            Self::Communication => "Communication",
            Self::Strategy => "Strategy Alignment",
            Self::MarketingBudget => "Marketing Budget",
            Self::Platforms => "Platform Usage",
        }
    }
}

/// Discrete contribution to the overall score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub dimension: ScoreDimension,
    pub points: u16,
    pub notes: String,
}

/// Weighted components plus the rounded average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub raw_total: u16,
    pub score: u16,
}

impl ScoreBreakdown {
    pub fn from_answers(answers: &AssessmentAnswers) -> Self {
        let components: Vec<ScoreComponent> = ScoreDimension::ordered()
            .into_iter()
            .map(|dimension| component(dimension, answers))
            .collect();

        let raw_total: u16 = components.iter().map(|component| component.points).sum();
        let score = round_half_up(u32::from(raw_total), u32::from(DIMENSION_COUNT)) as u16;

        Self {
            components,
            raw_total,
            score,
        }
    }

    /// True when the uncapped formula lands above the nominal 100 point scale.
    pub fn exceeds_scale(&self) -> bool {
        self.score > NOMINAL_MAX
    }
}

fn component(dimension: ScoreDimension, answers: &AssessmentAnswers) -> ScoreComponent {
    match dimension {
        ScoreDimension::Design => rating_component(dimension, answers.design_quality),
        ScoreDimension::Communication => {
            rating_component(dimension, answers.communication_clarity)
        }
        ScoreDimension::Strategy => rating_component(dimension, answers.strategy_alignment),
        ScoreDimension::MarketingBudget => match answers.marketing_budget {
            Some(budget) => ScoreComponent {
                dimension,
                points: PRESENCE_POINTS,
                notes: format!("budget band {} selected", budget.token()),
            },
            None => ScoreComponent {
                dimension,
                points: 0,
                notes: "no marketing budget selected".to_string(),
            },
        },
        ScoreDimension::Platforms => {
            if answers.has_platforms() {
                ScoreComponent {
                    dimension,
                    points: PRESENCE_POINTS,
                    notes: format!("{} platform(s) in use", answers.platforms_used.len()),
                }
            } else {
                ScoreComponent {
                    dimension,
                    points: 0,
                    notes: "no platforms selected".to_string(),
                }
            }
        }
    }
}

fn rating_component(dimension: ScoreDimension, rating: Rating) -> ScoreComponent {
    ScoreComponent {
        dimension,
        points: u16::from(rating.value()) * RATING_WEIGHT,
        notes: format!("rated {}/{}", rating.value(), Rating::MAX),
    }
}

/// Overall audit score: the five weighted dimensions averaged and rounded half up.
pub fn score(answers: &AssessmentAnswers) -> u16 {
    ScoreBreakdown::from_answers(answers).score
}

/// Integer division rounding halves away from zero.
pub(crate) fn round_half_up(numerator: u32, denominator: u32) -> u32 {
    (2 * numerator + denominator) / (2 * denominator)
}
