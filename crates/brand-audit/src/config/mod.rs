use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::Secret;

const DEFAULT_ANALYZER_DELAY_MS: u64 = 2000;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
const DEFAULT_EMAILJS_BASE_URL: &str = "https://api.emailjs.com";
const DEFAULT_CONTACT_PHONE: &str = "+1234567890";
const DEFAULT_CONTACT_WHATSAPP: &str = "1234567890";
const DEFAULT_CONTACT_EMAIL: &str = "hello@magsmen.com";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub analyzer: AnalyzerConfig,
    pub sessions: SessionConfig,
    pub email: Option<EmailConfig>,
    pub contact: ContactConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let delay_ms = match env::var("ANALYZER_DELAY_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidAnalyzerDelay)?,
            Err(_) => DEFAULT_ANALYZER_DELAY_MS,
        };

        let idle_secs = match env::var("SESSION_IDLE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSessionTimeout)?,
            Err(_) => DEFAULT_SESSION_IDLE_SECS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            analyzer: AnalyzerConfig {
                latency: Duration::from_millis(delay_ms),
            },
            sessions: SessionConfig {
                idle_timeout: Duration::from_secs(idle_secs),
            },
            email: load_email()?,
            contact: ContactConfig {
                phone: env_or("CONTACT_PHONE", DEFAULT_CONTACT_PHONE),
                whatsapp: env_or("CONTACT_WHATSAPP", DEFAULT_CONTACT_WHATSAPP),
                email: env_or("CONTACT_EMAIL", DEFAULT_CONTACT_EMAIL),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// The EmailJS triple is all-or-nothing.
fn load_email() -> Result<Option<EmailConfig>, ConfigError> {
    let service_id = non_empty("EMAILJS_SERVICE_ID");
    let template_id = non_empty("EMAILJS_TEMPLATE_ID");
    let public_key = non_empty("EMAILJS_PUBLIC_KEY");

    match (service_id, template_id, public_key) {
        (Some(service_id), Some(template_id), Some(public_key)) => Ok(Some(EmailConfig::new(
            service_id,
            template_id,
            public_key,
            env_or("EMAILJS_BASE_URL", DEFAULT_EMAILJS_BASE_URL),
        ))),
        (None, None, None) => Ok(None),
        (service_id, template_id, public_key) => {
            let mut missing = Vec::new();
            if service_id.is_none() {
                missing.push("EMAILJS_SERVICE_ID");
            }
            if template_id.is_none() {
                missing.push("EMAILJS_TEMPLATE_ID");
            }
            if public_key.is_none() {
                missing.push("EMAILJS_PUBLIC_KEY");
            }
            Err(ConfigError::PartialEmailCredentials { missing })
        }
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Simulated website analysis latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub latency: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_ANALYZER_DELAY_MS),
        }
    }
}

/// Sessions untouched for longer than `idle_timeout` are evicted from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

/// EmailJS credentials. The public key never appears in debug output.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: Secret<String>,
    pub base_url: String,
}

impl EmailConfig {
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: Secret::new(public_key.into()),
            base_url: base_url.into(),
        }
    }
}

/// Agency contact endpoints used to build follow-up links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfig {
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            phone: DEFAULT_CONTACT_PHONE.to_string(),
            whatsapp: DEFAULT_CONTACT_WHATSAPP.to_string(),
            email: DEFAULT_CONTACT_EMAIL.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAnalyzerDelay,
    InvalidSessionTimeout,
    PartialEmailCredentials { missing: Vec<&'static str> },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAnalyzerDelay => {
                write!(f, "ANALYZER_DELAY_MS must be a whole number of milliseconds")
            }
            ConfigError::InvalidSessionTimeout => {
                write!(f, "SESSION_IDLE_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::PartialEmailCredentials { missing } => write!(
                f,
                "EmailJS credentials are incomplete; missing {}",
                missing.join(", ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidAnalyzerDelay
            | ConfigError::InvalidSessionTimeout
            | ConfigError::PartialEmailCredentials { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "ANALYZER_DELAY_MS",
            "SESSION_IDLE_TIMEOUT_SECS",
            "EMAILJS_SERVICE_ID",
            "EMAILJS_TEMPLATE_ID",
            "EMAILJS_PUBLIC_KEY",
            "EMAILJS_BASE_URL",
            "CONTACT_PHONE",
            "CONTACT_WHATSAPP",
            "CONTACT_EMAIL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.analyzer.latency, Duration::from_millis(2000));
        assert_eq!(config.sessions.idle_timeout, Duration::from_secs(1800));
        assert!(config.email.is_none());
        assert_eq!(config.contact, ContactConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn loads_complete_email_triple() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("EMAILJS_SERVICE_ID", "service_abc");
        env::set_var("EMAILJS_TEMPLATE_ID", "template_def");
        env::set_var("EMAILJS_PUBLIC_KEY", "pk_123");

        let config = AppConfig::load().expect("config loads");
        let email = config.email.expect("email configured");
        assert_eq!(email.service_id, "service_abc");
        assert_eq!(email.public_key.expose_secret(), "pk_123");
        assert_eq!(email.base_url, "https://api.emailjs.com");
        assert!(!format!("{email:?}").contains("pk_123"));
        reset_env();
    }

    #[test]
    fn rejects_partial_email_triple() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("EMAILJS_SERVICE_ID", "service_abc");

        let err = AppConfig::load().expect_err("partial triple rejected");
        match err {
            ConfigError::PartialEmailCredentials { missing } => {
                assert_eq!(missing, vec!["EMAILJS_TEMPLATE_ID", "EMAILJS_PUBLIC_KEY"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_analyzer_delay() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ANALYZER_DELAY_MS", "soon");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAnalyzerDelay)
        ));
        reset_env();
    }

    #[test]
    fn session_idle_timeout_is_configurable() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SESSION_IDLE_TIMEOUT_SECS", " 90 ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.sessions.idle_timeout, Duration::from_secs(90));

        env::set_var("SESSION_IDLE_TIMEOUT_SECS", "forever");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidSessionTimeout)
        ));
        reset_env();
    }

    #[test]
    fn contact_overrides_are_trimmed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CONTACT_EMAIL", "  studio@example.com ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.contact.email, "studio@example.com");
        assert_eq!(config.contact.phone, "+1234567890");
        reset_env();
    }
}
