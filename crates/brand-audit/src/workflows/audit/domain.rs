use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Self-assessment rating on the 1-10 scale used by the design, communication and strategy steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: Rating = Rating(5);

    pub fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange { value })
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating {value} is outside the 1-10 scale")]
pub struct RatingOutOfRange {
    pub value: u8,
}

/// Monthly marketing budget bands offered on the marketing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketingBudget {
    #[serde(rename = "0-1000")]
    UpToOneLakh,
    #[serde(rename = "1000-5000")]
    OneToFiveLakh,
    #[serde(rename = "5000-10000")]
    UnderTenLakh,
}

impl MarketingBudget {
    pub const fn ordered() -> [Self; 3] {
        [Self::UpToOneLakh, Self::OneToFiveLakh, Self::UnderTenLakh]
    }

    /// Token forwarded to the email template.
    pub const fn token(self) -> &'static str {
        match self {
            Self::UpToOneLakh => "0-1000",
            Self::OneToFiveLakh => "1000-5000",
            Self::UnderTenLakh => "5000-10000",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UpToOneLakh => "$0 - $1,00,000",
            Self::OneToFiveLakh => "$1,00,000 - $5,00,000",
            Self::UnderTenLakh => "less than $10,00,000",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|budget| budget.token() == token.trim())
    }
}

/// Customer engagement channels listed on the platforms step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Website,
    Instagram,
    Facebook,
    LinkedIn,
    #[serde(rename = "Twitter/X")]
    TwitterX,
    TikTok,
    YouTube,
    #[serde(rename = "Email Marketing")]
    EmailMarketing,
    #[serde(rename = "Google Ads")]
    GoogleAds,
    #[serde(rename = "SEO")]
    Seo,
    #[serde(rename = "Print Media")]
    PrintMedia,
    #[serde(rename = "Radio/TV")]
    RadioTv,
    Events,
    Other,
}

impl Platform {
    pub const fn catalog() -> [Self; 14] {
        [
            Self::Website,
            Self::Instagram,
            Self::Facebook,
            Self::LinkedIn,
            Self::TwitterX,
            Self::TikTok,
            Self::YouTube,
            Self::EmailMarketing,
            Self::GoogleAds,
            Self::Seo,
            Self::PrintMedia,
            Self::RadioTv,
            Self::Events,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
            Self::LinkedIn => "LinkedIn",
            Self::TwitterX => "Twitter/X",
            Self::TikTok => "TikTok",
            Self::YouTube => "YouTube",
            Self::EmailMarketing => "Email Marketing",
            Self::GoogleAds => "Google Ads",
            Self::Seo => "SEO",
            Self::PrintMedia => "Print Media",
            Self::RadioTv => "Radio/TV",
            Self::Events => "Events",
            Self::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::catalog()
            .into_iter()
            .find(|platform| platform.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Names every answer field so errors and updates can be keyed uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerField {
    Name,
    Email,
    Contact,
    Website,
    BusinessType,
    CurrentBrand,
    DesignQuality,
    CommunicationClarity,
    StrategyAlignment,
    MarketingBudget,
    PlatformsUsed,
    AdditionalInfo,
}

impl AnswerField {
    /// Parameter name used by the email template.
    pub const fn template_key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Contact => "contact",
            Self::Website => "website",
            Self::BusinessType => "businessType",
            Self::CurrentBrand => "currentBrand",
            Self::DesignQuality => "designQuality",
            Self::CommunicationClarity => "communicationClarity",
            Self::StrategyAlignment => "strategyAlignment",
            Self::MarketingBudget => "marketingBudget",
            Self::PlatformsUsed => "platformsUsed",
            Self::AdditionalInfo => "additionalInfo",
        }
    }
}

/// Answers collected across the six wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentAnswers {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub website: String,
    pub business_type: String,
    pub current_brand: String,
    pub design_quality: Rating,
    pub communication_clarity: Rating,
    pub strategy_alignment: Rating,
    pub marketing_budget: Option<MarketingBudget>,
    pub platforms_used: Vec<Platform>,
    pub additional_info: String,
}

impl AssessmentAnswers {
    /// Merge a single field update. Ratings outside 1-10 are rejected and leave the answers untouched.
    pub fn apply(&mut self, update: FieldUpdate) -> Result<AnswerField, FieldUpdateError> {
        let field = update.field();
        match update {
            FieldUpdate::Name(value) => self.name = value,
            FieldUpdate::Email(value) => self.email = value,
            FieldUpdate::Contact(value) => self.contact = value,
            FieldUpdate::Website(value) => self.website = value,
            FieldUpdate::BusinessType(value) => self.business_type = value,
            FieldUpdate::CurrentBrand(value) => self.current_brand = value,
            FieldUpdate::DesignQuality(value) => self.design_quality = rating_for(field, value)?,
            FieldUpdate::CommunicationClarity(value) => {
                self.communication_clarity = rating_for(field, value)?
            }
            FieldUpdate::StrategyAlignment(value) => {
                self.strategy_alignment = rating_for(field, value)?
            }
            FieldUpdate::MarketingBudget(value) => self.marketing_budget = value,
            FieldUpdate::PlatformsUsed(platforms) => {
                self.platforms_used.clear();
                for platform in platforms {
                    self.select_platform(platform, true);
                }
            }
            FieldUpdate::AdditionalInfo(value) => self.additional_info = value,
        }
        Ok(field)
    }

    /// Checkbox semantics: selecting keeps the first insertion, deselecting removes it.
    pub fn select_platform(&mut self, platform: Platform, selected: bool) {
        if selected {
            if !self.platforms_used.contains(&platform) {
                self.platforms_used.push(platform);
            }
        } else {
            self.platforms_used.retain(|existing| *existing != platform);
        }
    }

    pub fn has_budget(&self) -> bool {
        self.marketing_budget.is_some()
    }

    pub fn has_platforms(&self) -> bool {
        !self.platforms_used.is_empty()
    }

    pub fn platforms_joined(&self) -> String {
        self.platforms_used
            .iter()
            .map(|platform| platform.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn rating_for(field: AnswerField, value: u8) -> Result<Rating, FieldUpdateError> {
    Rating::new(value).map_err(|_| FieldUpdateError::RatingOutOfRange { field, value })
}

/// A single field edit as submitted by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate {
    Name(String),
    Email(String),
    Contact(String),
    Website(String),
    BusinessType(String),
    CurrentBrand(String),
    DesignQuality(u8),
    CommunicationClarity(u8),
    StrategyAlignment(u8),
    MarketingBudget(Option<MarketingBudget>),
    PlatformsUsed(Vec<Platform>),
    AdditionalInfo(String),
}

impl FieldUpdate {
    pub const fn field(&self) -> AnswerField {
        match self {
            Self::Name(_) => AnswerField::Name,
            Self::Email(_) => AnswerField::Email,
            Self::Contact(_) => AnswerField::Contact,
            Self::Website(_) => AnswerField::Website,
            Self::BusinessType(_) => AnswerField::BusinessType,
            Self::CurrentBrand(_) => AnswerField::CurrentBrand,
            Self::DesignQuality(_) => AnswerField::DesignQuality,
            Self::CommunicationClarity(_) => AnswerField::CommunicationClarity,
            Self::StrategyAlignment(_) => AnswerField::StrategyAlignment,
            Self::MarketingBudget(_) => AnswerField::MarketingBudget,
            Self::PlatformsUsed(_) => AnswerField::PlatformsUsed,
            Self::AdditionalInfo(_) => AnswerField::AdditionalInfo,
        }
    }
}

/// Rejected field edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldUpdateError {
    #[error("{field:?} must be between 1 and 10 (found {value})")]
    RatingOutOfRange { field: AnswerField, value: u8 },
}

/// Answers frozen at wizard completion together with the computed score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredAssessment {
    #[serde(flatten)]
    pub answers: AssessmentAnswers,
    pub score: u16,
    pub completed_at: DateTime<Utc>,
}
