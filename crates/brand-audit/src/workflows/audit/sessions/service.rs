use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::StatusCode;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::repository::{RepositoryError, SessionRepository};
use super::session::{next_session_id, AuditSession, AuditView, SessionId};
use crate::config::ContactConfig;
use crate::workflows::audit::analyzer::{WebsiteAnalysis, WebsiteAnalyzer};
use crate::workflows::audit::contact::{contact_links, ContactLinks};
use crate::workflows::audit::domain::{FieldUpdate, Platform, ScoredAssessment};
use crate::workflows::audit::notifications::Notification;
use crate::workflows::audit::results::{
    present, ContactPitch, RecommendationTier, ResultsPresentation,
};
use crate::workflows::audit::submission::{SubmissionOutcome, SubmissionSink};
use crate::workflows::audit::wizard::{AuditWizard, WizardError, WizardTransition};

/// Service composing session storage, the website analyzer and the submission sink.
pub struct AuditSessionService<R> {
    repository: Arc<R>,
    analyzer: WebsiteAnalyzer,
    sink: SubmissionSink,
    contact: ContactConfig,
    writes: Arc<Mutex<()>>,
}

/// Outcome of pressing "Next" on a session.
#[derive(Debug)]
pub struct Advance {
    pub session: AuditSession,
    pub transition: WizardTransition,
    /// Present only when the wizard completed and the submission was dispatched.
    pub submission: Option<JoinHandle<SubmissionOutcome>>,
}

/// What happened to a finished background analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Applied(WebsiteAnalysis),
    /// The visitor had already moved on; the analysis was dropped.
    Discarded,
    Failed,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ContactOptions {
    pub tier: RecommendationTier,
    pub pitch: ContactPitch,
    pub links: ContactLinks,
}

impl<R> AuditSessionService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        analyzer: WebsiteAnalyzer,
        sink: SubmissionSink,
        contact: ContactConfig,
    ) -> Self {
        Self {
            repository,
            analyzer,
            sink,
            contact,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Open a new session on the landing view.
    pub fn create(&self) -> Result<AuditSession, SessionError> {
        let session = AuditSession::new(next_session_id());
        let stored = self.repository.insert(session)?;
        info!(session = %stored.id, "audit session created");
        Ok(stored)
    }

    pub fn get(&self, id: &SessionId) -> Result<AuditSession, SessionError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Landing to audit with fresh default answers.
    pub fn start_audit(&self, id: &SessionId) -> Result<AuditSession, SessionError> {
        self.mutate(id, |session| {
            if !matches!(session.view, AuditView::Landing) {
                return Err(SessionError::invalid_view("landing", &session.view));
            }
            let run = session.begin_audit();
            info!(session = %session.id, run, "audit started");
            Ok(())
        })
    }

    pub fn update_field(
        &self,
        id: &SessionId,
        update: FieldUpdate,
    ) -> Result<AuditSession, SessionError> {
        self.mutate(id, |session| {
            let wizard = wizard_mut(&mut session.view)?;
            debug!(session = %session.id, field = ?update.field(), "answer updated");
            wizard.update_field(update)?;
            Ok(())
        })
    }

    pub fn toggle_platform(
        &self,
        id: &SessionId,
        platform: Platform,
        selected: bool,
    ) -> Result<AuditSession, SessionError> {
        self.mutate(id, |session| {
            wizard_mut(&mut session.view)?.toggle_platform(platform, selected)?;
            Ok(())
        })
    }

    /// Press "Next". Completion moves the session to results and dispatches the submission
    /// without waiting for it.
    pub fn advance(&self, id: &SessionId) -> Result<Advance, SessionError> {
        let (session, transition) = self.mutate_with(id, |session| {
            let outcome = wizard_mut(&mut session.view)?.next()?;
            match &outcome {
                WizardTransition::Advanced(step) => {
                    info!(session = %session.id, step = step.title(), "wizard advanced");
                }
                WizardTransition::Blocked(errors) => {
                    info!(
                        session = %session.id,
                        errors = errors.len(),
                        "wizard blocked by validation"
                    );
                }
                WizardTransition::Completed(scored) => {
                    info!(session = %session.id, score = scored.score, "assessment completed");
                    session.view = AuditView::Results(scored.clone());
                }
            }
            Ok(outcome)
        })?;

        // Only a stored completion is submitted; a failed store leaves the wizard open.
        let submission = match &transition {
            WizardTransition::Completed(scored) => {
                let notifier = Arc::new(session.notifications.clone());
                Some(self.sink.dispatch(scored, notifier))
            }
            _ => None,
        };

        Ok(Advance {
            session,
            transition,
            submission,
        })
    }

    pub fn prev(&self, id: &SessionId) -> Result<AuditSession, SessionError> {
        self.mutate(id, |session| {
            let step = wizard_mut(&mut session.view)?.prev()?;
            debug!(session = %session.id, step = step.title(), "wizard moved back");
            Ok(())
        })
    }

    /// Start a background analysis of the stored website. The result is applied only if the
    /// same audit run is still on the basic information step when it arrives.
    pub fn analyze(&self, id: &SessionId) -> Result<JoinHandle<AnalysisOutcome>, SessionError> {
        let session = self.get(id)?;
        let website = match &session.view {
            AuditView::Audit(wizard) => wizard.answers().website.trim().to_string(),
            other => return Err(SessionError::invalid_view("audit", other)),
        };
        if website.is_empty() {
            return Err(SessionError::MissingWebsite);
        }

        let analyzer = self.analyzer.clone();
        let repository = Arc::clone(&self.repository);
        let writes = Arc::clone(&self.writes);
        let notifier = session.notifications.clone();
        let id = session.id.clone();
        let run = session.audit_run;

        info!(session = %id, run, %website, "website analysis requested");
        Ok(tokio::spawn(async move {
            match analyzer.analyze(&website, &notifier).await {
                Some(analysis) => {
                    apply_analysis(repository.as_ref(), &writes, &id, run, analysis)
                }
                None => AnalysisOutcome::Failed,
            }
        }))
    }

    pub fn results(&self, id: &SessionId) -> Result<ResultsPresentation, SessionError> {
        let session = self.get(id)?;
        let scored = completed(&session)?;
        Ok(present(scored))
    }

    pub fn contact_options(&self, id: &SessionId) -> Result<ContactOptions, SessionError> {
        let session = self.get(id)?;
        let scored = completed(&session)?;
        let tier = RecommendationTier::for_score(scored.score);
        Ok(ContactOptions {
            tier,
            pitch: tier.contact_pitch(),
            links: contact_links(&self.contact, scored.score),
        })
    }

    /// Results back to landing; the finished answers are discarded.
    pub fn start_over(&self, id: &SessionId) -> Result<AuditSession, SessionError> {
        self.mutate(id, |session| {
            if !matches!(session.view, AuditView::Results(_)) {
                return Err(SessionError::invalid_view("results", &session.view));
            }
            session.view = AuditView::Landing;
            info!(session = %session.id, "session restarted");
            Ok(())
        })
    }

    pub fn drain_notifications(&self, id: &SessionId) -> Result<Vec<Notification>, SessionError> {
        Ok(self.get(id)?.notifications.drain())
    }

    /// Fetch, mutate and store a session while holding the write lock. Nothing is stored
    /// when the mutation fails.
    fn mutate<F>(&self, id: &SessionId, apply: F) -> Result<AuditSession, SessionError>
    where
        F: FnOnce(&mut AuditSession) -> Result<(), SessionError>,
    {
        self.mutate_with(id, apply).map(|(session, ())| session)
    }

    fn mutate_with<F, T>(
        &self,
        id: &SessionId,
        apply: F,
    ) -> Result<(AuditSession, T), SessionError>
    where
        F: FnOnce(&mut AuditSession) -> Result<T, SessionError>,
    {
        let _guard = lock_writes(&self.writes)?;
        let mut session = self
            .repository
            .fetch(id)?
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        let output = apply(&mut session)?;
        self.repository.update(session.clone())?;
        Ok((session, output))
    }
}

fn wizard_mut(view: &mut AuditView) -> Result<&mut AuditWizard, SessionError> {
    match view {
        AuditView::Audit(wizard) => Ok(wizard),
        other => Err(SessionError::invalid_view("audit", other)),
    }
}

fn completed(session: &AuditSession) -> Result<&ScoredAssessment, SessionError> {
    match &session.view {
        AuditView::Results(scored) => Ok(&**scored),
        other => Err(SessionError::invalid_view("results", other)),
    }
}

fn lock_writes(writes: &Mutex<()>) -> Result<MutexGuard<'_, ()>, SessionError> {
    writes.lock().map_err(|_| {
        SessionError::Repository(RepositoryError::Unavailable(
            "session write lock poisoned".to_string(),
        ))
    })
}

fn apply_analysis<R: SessionRepository>(
    repository: &R,
    writes: &Mutex<()>,
    id: &SessionId,
    run: u64,
    analysis: WebsiteAnalysis,
) -> AnalysisOutcome {
    let Ok(_guard) = lock_writes(writes) else {
        return AnalysisOutcome::Discarded;
    };
    let Ok(Some(mut session)) = repository.fetch(id) else {
        return AnalysisOutcome::Discarded;
    };

    let same_run = session.audit_run == run;
    let applied = match &mut session.view {
        AuditView::Audit(wizard) if same_run => wizard.apply_analysis(&analysis),
        _ => false,
    };

    if applied && repository.update(session).is_ok() {
        info!(session = %id, business_type = %analysis.business_type, "analysis applied");
        AnalysisOutcome::Applied(analysis)
    } else {
        debug!(session = %id, run, "analysis outlived its audit step; discarded");
        AnalysisOutcome::Discarded
    }
}

/// Error raised by the session service.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("session is on the {found} view; expected {expected}")]
    InvalidView {
        expected: &'static str,
        found: &'static str,
    },
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("enter a website URL before requesting an analysis")]
    MissingWebsite,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SessionError {
    fn invalid_view(expected: &'static str, found: &AuditView) -> Self {
        Self::InvalidView {
            expected,
            found: found.label(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidView { .. } | Self::Wizard(WizardError::Finalized) => StatusCode::CONFLICT,
            Self::Wizard(WizardError::Field(_)) | Self::MissingWebsite => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
