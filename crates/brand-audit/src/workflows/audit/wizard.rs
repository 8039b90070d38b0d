use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::analyzer::WebsiteAnalysis;
use super::domain::{
    AnswerField, AssessmentAnswers, FieldUpdate, FieldUpdateError, Platform, ScoredAssessment,
};
use super::scoring;
use super::validation::{validate_basic_info, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Basic,
    Design,
    Communication,
    Strategy,
    Marketing,
    Platforms,
}

impl WizardStep {
    pub const COUNT: usize = 6;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Basic,
            Self::Design,
            Self::Communication,
            Self::Strategy,
            Self::Marketing,
            Self::Platforms,
        ]
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Basic => "Basic Information",
            Self::Design => "Design Audit",
            Self::Communication => "Communication",
            Self::Strategy => "Strategy",
            Self::Marketing => "Marketing & Budget",
            Self::Platforms => "Platforms Used",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Basic => 0,
            Self::Design => 1,
            Self::Communication => 2,
            Self::Strategy => 3,
            Self::Marketing => 4,
            Self::Platforms => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ordered().get(index).copied()
    }

    pub fn is_last(self) -> bool {
        self.index() + 1 == Self::COUNT
    }
}

/// Result of pressing "Next".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardTransition {
    Advanced(WizardStep),
    Blocked(ValidationErrors),
    Completed(Box<ScoredAssessment>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("assessment already completed")]
    Finalized,
    #[error(transparent)]
    Field(#[from] FieldUpdateError),
}

/// Six-step questionnaire state machine. Identity fields are validated only when leaving step 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditWizard {
    step: WizardStep,
    answers: AssessmentAnswers,
    errors: ValidationErrors,
    finalized: bool,
}

impl Default for AuditWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditWizard {
    pub fn new() -> Self {
        Self::with_answers(AssessmentAnswers::default())
    }

    pub fn with_answers(answers: AssessmentAnswers) -> Self {
        Self {
            step: WizardStep::Basic,
            answers,
            errors: ValidationErrors::default(),
            finalized: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn answers(&self) -> &AssessmentAnswers {
        &self.answers
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn progress_percent(&self) -> f32 {
        (self.step.index() + 1) as f32 / WizardStep::COUNT as f32 * 100.0
    }

    pub fn step_label(&self) -> String {
        format!("Step {} of {}", self.step.index() + 1, WizardStep::COUNT)
    }

    /// Merge a field value and drop any pending error for that field.
    pub fn update_field(&mut self, update: FieldUpdate) -> Result<(), WizardError> {
        self.ensure_open()?;
        let field = self.answers.apply(update)?;
        self.errors.clear_field(field);
        Ok(())
    }

    pub fn toggle_platform(
        &mut self,
        platform: Platform,
        selected: bool,
    ) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.answers.select_platform(platform, selected);
        self.errors.clear_field(AnswerField::PlatformsUsed);
        Ok(())
    }

    pub fn next(&mut self) -> Result<WizardTransition, WizardError> {
        self.ensure_open()?;

        if self.step == WizardStep::Basic {
            let errors = validate_basic_info(&self.answers);
            if !errors.is_empty() {
                self.errors = errors.clone();
                return Ok(WizardTransition::Blocked(errors));
            }
        }
        self.errors = ValidationErrors::default();

        if self.step.is_last() {
            return Ok(WizardTransition::Completed(Box::new(self.finalize())));
        }

        self.step = WizardStep::from_index(self.step.index() + 1).unwrap_or(self.step);
        Ok(WizardTransition::Advanced(self.step))
    }

    /// Step back without validation; a no-op on the first step.
    pub fn prev(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_open()?;
        if let Some(index) = self.step.index().checked_sub(1) {
            self.step = WizardStep::from_index(index).unwrap_or(self.step);
        }
        Ok(self.step)
    }

    /// Pre-fill business type and brand description from a website analysis.
    ///
    /// Returns `false` (and leaves the answers alone) once the visitor has moved past the
    /// basic information step.
    pub fn apply_analysis(&mut self, analysis: &WebsiteAnalysis) -> bool {
        if self.finalized || self.step != WizardStep::Basic {
            return false;
        }

        let updates = [
            FieldUpdate::BusinessType(analysis.business_type.clone()),
            FieldUpdate::CurrentBrand(analysis.brand_description.clone()),
        ];
        for update in updates {
            if self.update_field(update).is_err() {
                return false;
            }
        }
        true
    }

    fn finalize(&mut self) -> ScoredAssessment {
        self.finalized = true;
        ScoredAssessment {
            answers: self.answers.clone(),
            score: scoring::score(&self.answers),
            completed_at: Utc::now(),
        }
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.finalized {
            Err(WizardError::Finalized)
        } else {
            Ok(())
        }
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            step_title: self.step.title(),
            step_index: self.step.index(),
            step_count: WizardStep::COUNT,
            step_label: self.step_label(),
            progress_percent: self.progress_percent(),
            can_go_back: self.step.index() > 0,
            next_label: if self.step.is_last() {
                "Complete Assessment"
            } else {
                "Next"
            },
            answers: self.answers.clone(),
            errors: self.errors.clone(),
        }
    }
}

/// Serializable view of the wizard for the audit screen.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub step_title: &'static str,
    pub step_index: usize,
    pub step_count: usize,
    pub step_label: String,
    pub progress_percent: f32,
    pub can_go_back: bool,
    pub next_label: &'static str,
    pub answers: AssessmentAnswers,
    pub errors: ValidationErrors,
}
