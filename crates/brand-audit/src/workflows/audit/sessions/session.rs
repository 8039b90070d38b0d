use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::audit::domain::ScoredAssessment;
use crate::workflows::audit::notifications::NotificationQueue;
use crate::workflows::audit::results::{present, ResultsPresentation};
use crate::workflows::audit::wizard::{AuditWizard, WizardSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 128 random bits. The id is the only handle guarding a visitor's answers.
pub(crate) fn next_session_id() -> SessionId {
    SessionId(format!("audit-{:032x}", fastrand::u128(..)))
}

/// Top-level screen a visitor is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditView {
    Landing,
    Audit(AuditWizard),
    Results(Box<ScoredAssessment>),
}

impl AuditView {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Audit(_) => "audit",
            Self::Results(_) => "results",
        }
    }
}

/// One visitor's progress through landing, audit and results.
#[derive(Debug, Clone)]
pub struct AuditSession {
    pub id: SessionId,
    pub view: AuditView,
    pub notifications: NotificationQueue,
    /// Bumped every time an audit starts; background work tagged with an older run is stale.
    pub audit_run: u64,
}

impl AuditSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            view: AuditView::Landing,
            notifications: NotificationQueue::default(),
            audit_run: 0,
        }
    }

    /// Enter the audit view with a fresh wizard and return the new run number.
    pub fn begin_audit(&mut self) -> u64 {
        self.audit_run += 1;
        self.view = AuditView::Audit(AuditWizard::new());
        self.audit_run
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (wizard, results) = match &self.view {
            AuditView::Landing => (None, None),
            AuditView::Audit(wizard) => (Some(wizard.snapshot()), None),
            AuditView::Results(scored) => (None, Some(present(scored))),
        };

        SessionSnapshot {
            id: self.id.clone(),
            view: self.view.label(),
            wizard,
            results,
            pending_notifications: self.notifications.snapshot().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard: Option<WizardSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsPresentation>,
    pub pending_notifications: usize,
}
