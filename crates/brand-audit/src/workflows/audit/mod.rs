//! Brand audit lead-generation flow: a six-step self-assessment wizard, its score, the
//! results projection and the hand-off of completed assessments by email.

pub mod analyzer;
pub mod contact;
pub mod domain;
pub mod notifications;
pub mod results;
pub mod scoring;
pub mod sessions;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use analyzer::{
    BusinessCategory, FastrandSignals, FixedSignals, MockWebsiteInspector, SignalSource,
    WebsiteAnalysis, WebsiteAnalyzer, WebsiteInspector,
};
pub use contact::{contact_links, ContactLinks};
pub use domain::{
    AnswerField, AssessmentAnswers, FieldUpdate, MarketingBudget, Platform, Rating,
    ScoredAssessment,
};
pub use notifications::{Notification, NotificationQueue, NotificationVariant, Notifier};
pub use results::{present, RecommendationTier, ResultsPresentation};
pub use scoring::{score, ScoreBreakdown, ScoreDimension};
pub use sessions::{audit_router, AuditSessionService, SessionError, SessionRepository};
pub use submission::{
    EmailGateway, EmailJsGateway, SubmissionOutcome, SubmissionPayload, SubmissionSink,
    UnconfiguredEmailGateway,
};
pub use validation::{validate_basic_info, ValidationErrors};
pub use wizard::{AuditWizard, WizardError, WizardStep, WizardTransition};
