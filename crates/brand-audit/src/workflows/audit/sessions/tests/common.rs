use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::config::ContactConfig;
use crate::workflows::audit::analyzer::{
    AnalysisError, FixedSignals, MockWebsiteInspector, WebsiteAnalysis, WebsiteAnalyzer,
    WebsiteInspector,
};
use crate::workflows::audit::domain::{FieldUpdate, MarketingBudget, Platform};
use crate::workflows::audit::sessions::{
    audit_router, AuditSession, AuditSessionService, RepositoryError, SessionId,
    SessionRepository,
};
use crate::workflows::audit::submission::{
    EmailError, EmailGateway, EmailReceipt, SubmissionPayload, SubmissionSink,
    UnconfiguredEmailGateway,
};

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, AuditSession>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, session: AuditSession) -> Result<AuditSession, RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: AuditSession) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AuditSession>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Delegates to a [`MemoryRepository`] but rejects updates while `fail_updates` is set.
#[derive(Default)]
pub(super) struct FlakyRepository {
    pub(super) inner: MemoryRepository,
    pub(super) fail_updates: AtomicBool,
}

impl SessionRepository for FlakyRepository {
    fn insert(&self, session: AuditSession) -> Result<AuditSession, RepositoryError> {
        self.inner.insert(session)
    }

    fn update(&self, session: AuditSession) -> Result<(), RepositoryError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("write rejected".to_string()));
        }
        self.inner.update(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AuditSession>, RepositoryError> {
        self.inner.fetch(id)
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _session: AuditSession) -> Result<AuditSession, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _session: AuditSession) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<AuditSession>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingGateway {
    sent: Mutex<Vec<SubmissionPayload>>,
}

impl RecordingGateway {
    pub(super) fn sent(&self) -> Vec<SubmissionPayload> {
        self.sent.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl EmailGateway for RecordingGateway {
    async fn send(&self, payload: &SubmissionPayload) -> Result<EmailReceipt, EmailError> {
        self.sent
            .lock()
            .expect("gateway mutex poisoned")
            .push(payload.clone());
        Ok(EmailReceipt {
            status: 200,
            text: "OK".to_string(),
        })
    }
}

/// Holds every inspection until the test releases the gate.
pub(super) struct GatedInspector {
    pub(super) gate: Arc<Notify>,
    pub(super) inner: MockWebsiteInspector<FixedSignals>,
}

#[async_trait]
impl WebsiteInspector for GatedInspector {
    async fn inspect(&self, url: &str) -> Result<WebsiteAnalysis, AnalysisError> {
        self.gate.notified().await;
        self.inner.inspect(url).await
    }
}

pub(super) fn pinned_inspector() -> MockWebsiteInspector<FixedSignals> {
    MockWebsiteInspector::with_signals(
        Duration::ZERO,
        FixedSignals {
            unit: 0.0,
            rating: 7,
        },
    )
}

pub(super) fn build_service_with(
    repository: Arc<MemoryRepository>,
    inspector: Arc<dyn WebsiteInspector>,
    gateway: Arc<dyn EmailGateway>,
) -> AuditSessionService<MemoryRepository> {
    AuditSessionService::new(
        repository,
        WebsiteAnalyzer::new(inspector),
        SubmissionSink::new(gateway),
        ContactConfig::default(),
    )
}

pub(super) fn build_service() -> (
    AuditSessionService<MemoryRepository>,
    Arc<MemoryRepository>,
    Arc<RecordingGateway>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let gateway = Arc::new(RecordingGateway::default());
    let service = build_service_with(
        repository.clone(),
        Arc::new(pinned_inspector()),
        gateway.clone(),
    );
    (service, repository, gateway)
}

pub(super) fn unconfigured_service() -> AuditSessionService<MemoryRepository> {
    build_service_with(
        Arc::new(MemoryRepository::default()),
        Arc::new(pinned_inspector()),
        Arc::new(UnconfiguredEmailGateway),
    )
}

pub(super) fn jane_updates() -> Vec<FieldUpdate> {
    vec![
        FieldUpdate::Name("Jane".to_string()),
        FieldUpdate::Email("jane@x.com".to_string()),
        FieldUpdate::Contact("+14155551234".to_string()),
        FieldUpdate::DesignQuality(8),
        FieldUpdate::CommunicationClarity(7),
        FieldUpdate::StrategyAlignment(9),
        FieldUpdate::MarketingBudget(Some(MarketingBudget::OneToFiveLakh)),
        FieldUpdate::PlatformsUsed(vec![Platform::Website, Platform::Instagram]),
    ]
}

/// Create a session, start the audit and fill in the Jane scenario answers.
pub(super) fn started_jane_session<R>(service: &AuditSessionService<R>) -> SessionId
where
    R: SessionRepository + 'static,
{
    let session = service.create().expect("session created");
    service.start_audit(&session.id).expect("audit started");
    for update in jane_updates() {
        service
            .update_field(&session.id, update)
            .expect("update applies");
    }
    session.id
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: AuditSessionService<MemoryRepository>) -> axum::Router {
    audit_router(Arc::new(service))
}
