use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::domain::ScoredAssessment;
use super::notifications::{Notification, Notifier};
use crate::config::EmailConfig;

const SEND_PATH: &str = "/api/v1.0/email/send";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Flat template parameters expected by the lead notification email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub website: String,
    pub business_type: String,
    pub current_brand: String,
    pub design_quality: u8,
    pub communication_clarity: u8,
    pub strategy_alignment: u8,
    pub marketing_budget: String,
    pub platforms_used: String,
    pub additional_info: String,
    pub score: u16,
}

impl From<&ScoredAssessment> for SubmissionPayload {
    fn from(assessment: &ScoredAssessment) -> Self {
        let answers = &assessment.answers;
        Self {
            name: answers.name.clone(),
            email: answers.email.clone(),
            contact: answers.contact.clone(),
            website: answers.website.clone(),
            business_type: answers.business_type.clone(),
            current_brand: answers.current_brand.clone(),
            design_quality: answers.design_quality.value(),
            communication_clarity: answers.communication_clarity.value(),
            strategy_alignment: answers.strategy_alignment.value(),
            marketing_budget: answers
                .marketing_budget
                .map(|budget| budget.token().to_string())
                .unwrap_or_default(),
            platforms_used: answers.platforms_joined(),
            additional_info: answers.additional_info.clone(),
            score: assessment.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailReceipt {
    pub status: u16,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("email delivery is not configured")]
    NotConfigured,
    #[error("email transport failed: {0}")]
    Transport(String),
    #[error("email service rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound transactional email boundary.
#[async_trait]
pub trait EmailGateway: Send + Sync {
    async fn send(&self, payload: &SubmissionPayload) -> Result<EmailReceipt, EmailError>;
}

#[derive(Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a SubmissionPayload,
}

/// EmailJS REST client using the service/template/public-key triple.
pub struct EmailJsGateway {
    config: EmailConfig,
    client: Client,
}

impl std::fmt::Debug for EmailJsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsGateway")
            .field("service_id", &self.config.service_id)
            .field("template_id", &self.config.template_id)
            .finish_non_exhaustive()
    }
}

impl EmailJsGateway {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| EmailError::Transport(err.to_string()))?;
        Ok(Self { config, client })
    }

    fn send_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), SEND_PATH)
    }
}

#[async_trait]
impl EmailGateway for EmailJsGateway {
    async fn send(&self, payload: &SubmissionPayload) -> Result<EmailReceipt, EmailError> {
        let request = EmailJsRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: self.config.public_key.expose_secret(),
            template_params: payload,
        };

        let response = self
            .client
            .post(self.send_url())
            .json(&request)
            .send()
            .await
            .map_err(|err| EmailError::Transport(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| EmailError::Transport(err.to_string()))?;

        if status.is_success() {
            Ok(EmailReceipt {
                status: status.as_u16(),
                text,
            })
        } else {
            Err(EmailError::Rejected {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

/// Stand-in used when no credentials are configured; every send fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredEmailGateway;

#[async_trait]
impl EmailGateway for UnconfiguredEmailGateway {
    async fn send(&self, _payload: &SubmissionPayload) -> Result<EmailReceipt, EmailError> {
        Err(EmailError::NotConfigured)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Delivered(EmailReceipt),
    Failed(EmailError),
}

/// Fire-and-forget dispatch of completed assessments.
#[derive(Clone)]
pub struct SubmissionSink {
    gateway: Arc<dyn EmailGateway>,
}

impl std::fmt::Debug for SubmissionSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionSink").finish_non_exhaustive()
    }
}

impl SubmissionSink {
    pub fn new(gateway: Arc<dyn EmailGateway>) -> Self {
        Self { gateway }
    }

    /// Spawn the send and return immediately. The outcome only reaches the visitor through
    /// the notifier; the handle exists so callers may observe completion if they choose.
    pub fn dispatch(
        &self,
        assessment: &ScoredAssessment,
        notifier: Arc<dyn Notifier>,
    ) -> JoinHandle<SubmissionOutcome> {
        let gateway = Arc::clone(&self.gateway);
        let payload = SubmissionPayload::from(assessment);

        tokio::spawn(async move {
            match gateway.send(&payload).await {
                Ok(receipt) => {
                    info!(status = receipt.status, score = payload.score, "assessment submitted");
                    notifier.notify(Notification::info(
                        "Submission Sent",
                        "Assessment submitted successfully via email!",
                        3000,
                    ));
                    SubmissionOutcome::Delivered(receipt)
                }
                Err(err) => {
                    warn!(error = %err, score = payload.score, "assessment submission failed");
                    notifier.notify(Notification::destructive(
                        "Submission Failed",
                        "Failed to send email. Please try again.",
                        3000,
                    ));
                    SubmissionOutcome::Failed(err)
                }
            }
        })
    }
}
