use brand_audit::config::{AppConfig, EmailConfig, SessionConfig};
use brand_audit::error::AppError;
use brand_audit::workflows::audit::sessions::{
    AuditSession, AuditSessionService, RepositoryError, SessionId, SessionRepository,
};
use brand_audit::workflows::audit::{
    EmailGateway, EmailJsGateway, MockWebsiteInspector, SubmissionSink, UnconfiguredEmailGateway,
    WebsiteAnalyzer,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct StoredSession {
    session: AuditSession,
    touched: Instant,
}

/// Process-local session store. Sessions idle for `idle_timeout` are dropped lazily on access
/// and swept whenever a new session is inserted.
#[derive(Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, StoredSession>>>,
    idle_timeout: Duration,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(SessionConfig::default().idle_timeout)
    }
}

impl InMemorySessionRepository {
    pub(crate) fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    fn is_idle(&self, stored: &StoredSession, now: Instant) -> bool {
        now.saturating_duration_since(stored.touched) >= self.idle_timeout
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.lock().expect("repository mutex poisoned").len()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: AuditSession) -> Result<AuditSession, RepositoryError> {
        let now = Instant::now();
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");

        let before = guard.len();
        guard.retain(|_, stored| !self.is_idle(stored, now));
        let evicted = before - guard.len();
        if evicted > 0 {
            debug!(evicted, "idle audit sessions evicted");
        }

        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(
            session.id.clone(),
            StoredSession {
                session: session.clone(),
                touched: now,
            },
        );
        Ok(session)
    }

    fn update(&self, session: AuditSession) -> Result<(), RepositoryError> {
        let now = Instant::now();
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        match guard.get_mut(&session.id) {
            Some(stored) if !self.is_idle(stored, now) => {
                stored.session = session;
                stored.touched = now;
                Ok(())
            }
            Some(_) => {
                guard.remove(&session.id);
                Err(RepositoryError::NotFound)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AuditSession>, RepositoryError> {
        let now = Instant::now();
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        match guard.get_mut(id) {
            Some(stored) if !self.is_idle(stored, now) => {
                stored.touched = now;
                Ok(Some(stored.session.clone()))
            }
            Some(_) => {
                guard.remove(id);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

/// EmailJS when credentials are configured, otherwise a gateway that reports every send as failed.
pub(crate) fn email_gateway(config: Option<&EmailConfig>) -> Result<Arc<dyn EmailGateway>, AppError> {
    match config {
        Some(email) => Ok(Arc::new(EmailJsGateway::new(email.clone())?)),
        None => {
            warn!("EmailJS credentials not configured; assessment submissions will fail");
            Ok(Arc::new(UnconfiguredEmailGateway))
        }
    }
}

pub(crate) fn submission_sink(config: &AppConfig) -> Result<SubmissionSink, AppError> {
    Ok(SubmissionSink::new(email_gateway(config.email.as_ref())?))
}

pub(crate) fn session_service(
    config: &AppConfig,
) -> Result<AuditSessionService<InMemorySessionRepository>, AppError> {
    let analyzer = WebsiteAnalyzer::new(Arc::new(MockWebsiteInspector::new(
        config.analyzer.latency,
    )));

    Ok(AuditSessionService::new(
        Arc::new(InMemorySessionRepository::new(config.sessions.idle_timeout)),
        analyzer,
        submission_sink(config)?,
        config.contact.clone(),
    ))
}
