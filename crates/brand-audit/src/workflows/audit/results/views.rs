use chrono::{DateTime, Utc};
use serde::Serialize;

use super::tiers::{ContactPitch, RecommendationTier};
use crate::workflows::audit::scoring::ScoreDimension;

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub tier: RecommendationTier,
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
}

impl From<RecommendationTier> for RecommendationView {
    fn from(tier: RecommendationTier) -> Self {
        Self {
            tier,
            title: tier.title(),
            description: tier.description(),
            action: tier.action(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub dimension: ScoreDimension,
    pub name: &'static str,
    pub score: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessSummary {
    pub business_type: String,
    pub website: String,
    pub current_brand: String,
    pub marketing_budget: String,
    pub platforms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsPresentation {
    pub score: u16,
    pub exceeds_scale: bool,
    pub recommendation: RecommendationView,
    pub categories: Vec<CategoryRow>,
    pub contact: ContactPitch,
    pub summary: BusinessSummary,
    pub completed_at: DateTime<Utc>,
}
