//! Per-visitor session state gluing the wizard, analyzer, results and submission together.
//!
//! Each session is the single writer of its answer set: every mutation is a fetch, modify,
//! store cycle performed under the service's write lock. Background analysis re-enters that
//! cycle when it finishes.

pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use repository::{RepositoryError, SessionRepository};
pub use router::{audit_router, PlatformToggle};
pub use service::{Advance, AnalysisOutcome, AuditSessionService, ContactOptions, SessionError};
pub use session::{AuditSession, AuditView, SessionId, SessionSnapshot};
