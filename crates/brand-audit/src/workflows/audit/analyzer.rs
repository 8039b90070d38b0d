//! Website analysis used to pre-fill the basic information step.
//!
//! The shipped inspector never touches the network: it waits out a simulated latency and
//! derives its guesses from keywords in the URL plus random rolls. Randomness is injected
//! through [`SignalSource`] so tests can pin the outcome.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::Platform;
use super::notifications::{Notification, Notifier};

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

const RECOMMENDATIONS: [&str; 5] = [
    "Improve website loading speed for better user experience",
    "Enhance mobile responsiveness across all devices",
    "Optimize content for search engines (SEO)",
    "Strengthen brand consistency across all touchpoints",
    "Improve call-to-action placement and visibility",
];

const RECOMMENDATION_COUNT: usize = 3;

/// Platforms the mock inspector may "detect", with the roll each must beat.
const DETECTION_THRESHOLDS: [(Platform, f64); 5] = [
    (Platform::Instagram, 0.5),
    (Platform::Facebook, 0.5),
    (Platform::LinkedIn, 0.7),
    (Platform::GoogleAds, 0.8),
    (Platform::EmailMarketing, 0.6),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessCategory {
    Ecommerce,
    Consulting,
    Technology,
    FoodService,
    Healthcare,
    FinancialServices,
    ServiceBusiness,
}

impl BusinessCategory {
    /// Keyword table scanned in order; the first category with a matching keyword wins.
    const KEYWORDS: [(Self, [&'static str; 3]); 6] = [
        (Self::Ecommerce, ["shop", "store", "ecommerce"]),
        (Self::Consulting, ["consult", "advice", "expert"]),
        (Self::Technology, ["tech", "software", "app"]),
        (Self::FoodService, ["restaurant", "food", "cafe"]),
        (Self::Healthcare, ["health", "medical", "care"]),
        (Self::FinancialServices, ["finance", "bank", "investment"]),
    ];

    pub fn classify(url: &str) -> Self {
        let haystack = url.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| haystack.contains(keyword)))
            .map(|(category, _)| *category)
            .unwrap_or(Self::ServiceBusiness)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ecommerce => "E-commerce",
            Self::Consulting => "Consulting",
            Self::Technology => "Technology/SaaS",
            Self::FoodService => "Restaurant/Food Service",
            Self::Healthcare => "Healthcare",
            Self::FinancialServices => "Financial Services",
            Self::ServiceBusiness => "Service Business",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Ecommerce => "An online retail business focused on selling products to consumers",
            Self::Consulting => {
                "A professional service business providing expert advice and solutions"
            }
            Self::Technology => {
                "A technology company offering software solutions and digital services"
            }
            Self::FoodService => "A food service business focused on culinary experiences",
            Self::Healthcare => "A healthcare provider focused on patient care and medical services",
            Self::FinancialServices => {
                "A financial institution providing monetary services and advice"
            }
            Self::ServiceBusiness => {
                "A service-oriented business focused on delivering value to clients"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteAnalysis {
    pub business_type: String,
    pub brand_description: String,
    pub design_quality: u8,
    pub content_clarity: u8,
    pub platforms_detected: Vec<Platform>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("website inspection failed: {0}")]
    Inspection(String),
}

/// Pluggable source of website insights.
#[async_trait]
pub trait WebsiteInspector: Send + Sync {
    async fn inspect(&self, url: &str) -> Result<WebsiteAnalysis, AnalysisError>;
}

/// Random draws consumed by the mock inspector.
pub trait SignalSource: Send + Sync {
    /// Uniform draw in `[0, 1)`.
    fn unit(&self) -> f64;
    /// Uniform draw in `low..=high`.
    fn rating(&self, low: u8, high: u8) -> u8;
}

/// Nondeterministic draws backed by `fastrand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastrandSignals;

impl SignalSource for FastrandSignals {
    fn unit(&self) -> f64 {
        fastrand::f64()
    }

    fn rating(&self, low: u8, high: u8) -> u8 {
        fastrand::u8(low..=high)
    }
}

/// Fixed draws for reproducible analyses.
#[derive(Debug, Clone, Copy)]
pub struct FixedSignals {
    pub unit: f64,
    pub rating: u8,
}

impl SignalSource for FixedSignals {
    fn unit(&self) -> f64 {
        self.unit
    }

    fn rating(&self, low: u8, high: u8) -> u8 {
        self.rating.clamp(low, high)
    }
}

/// URL-pattern heuristics behind a simulated network delay.
#[derive(Debug, Clone)]
pub struct MockWebsiteInspector<S = FastrandSignals> {
    latency: Duration,
    signals: S,
}

impl MockWebsiteInspector<FastrandSignals> {
    pub fn new(latency: Duration) -> Self {
        Self::with_signals(latency, FastrandSignals)
    }
}

impl<S: SignalSource> MockWebsiteInspector<S> {
    pub fn with_signals(latency: Duration, signals: S) -> Self {
        Self { latency, signals }
    }

    fn detect_platforms(&self) -> Vec<Platform> {
        let mut platforms = vec![Platform::Website];
        for (platform, threshold) in DETECTION_THRESHOLDS {
            if self.signals.unit() > threshold {
                platforms.push(platform);
            }
        }
        platforms
    }
}

#[async_trait]
impl<S: SignalSource> WebsiteInspector for MockWebsiteInspector<S> {
    async fn inspect(&self, url: &str) -> Result<WebsiteAnalysis, AnalysisError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let category = BusinessCategory::classify(url);
        Ok(WebsiteAnalysis {
            business_type: category.label().to_string(),
            brand_description: category.description().to_string(),
            design_quality: self.signals.rating(6, 9),
            content_clarity: self.signals.rating(6, 9),
            platforms_detected: self.detect_platforms(),
            recommendations: RECOMMENDATIONS
                .iter()
                .take(RECOMMENDATION_COUNT)
                .map(|item| item.to_string())
                .collect(),
        })
    }
}

/// Runs an inspector and reports progress to the visitor.
#[derive(Clone)]
pub struct WebsiteAnalyzer {
    inspector: Arc<dyn WebsiteInspector>,
}

impl std::fmt::Debug for WebsiteAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebsiteAnalyzer").finish_non_exhaustive()
    }
}

impl WebsiteAnalyzer {
    pub fn new(inspector: Arc<dyn WebsiteInspector>) -> Self {
        Self { inspector }
    }

    /// Returns `None` for a blank URL or when inspection fails; failures are never retried.
    pub async fn analyze(&self, url: &str, notifier: &dyn Notifier) -> Option<WebsiteAnalysis> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }

        notifier.notify(Notification::info(
            "Analyzing Website",
            "Scanning your website for brand elements...",
            2000,
        ));

        match self.inspector.inspect(url).await {
            Ok(analysis) => {
                debug!(%url, business_type = %analysis.business_type, "website analysis complete");
                notifier.notify(Notification::info(
                    "Analysis Complete",
                    "Website analysis successful!",
                    3000,
                ));
                Some(analysis)
            }
            Err(err) => {
                warn!(%url, error = %err, "website analysis failed");
                notifier.notify(Notification::destructive(
                    "Analysis Failed",
                    "Could not analyze website. Please fill in manually.",
                    3000,
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::audit::notifications::{NotificationQueue, NotificationVariant};

    struct FailingInspector;

    #[async_trait]
    impl WebsiteInspector for FailingInspector {
        async fn inspect(&self, _url: &str) -> Result<WebsiteAnalysis, AnalysisError> {
            Err(AnalysisError::Inspection("connection reset".to_string()))
        }
    }

    fn pinned(unit: f64) -> MockWebsiteInspector<FixedSignals> {
        MockWebsiteInspector::with_signals(Duration::ZERO, FixedSignals { unit, rating: 7 })
    }

    #[test]
    fn classification_takes_the_first_matching_category() {
        assert_eq!(
            BusinessCategory::classify("https://MyShop.example"),
            BusinessCategory::Ecommerce
        );
        assert_eq!(
            BusinessCategory::classify("https://expert-tech.io"),
            BusinessCategory::Consulting
        );
        assert_eq!(
            BusinessCategory::classify("https://happyapp.dev"),
            BusinessCategory::Technology
        );
        assert_eq!(
            BusinessCategory::classify("https://skincare.co"),
            BusinessCategory::Healthcare
        );
        assert_eq!(
            BusinessCategory::classify("https://acme.com"),
            BusinessCategory::ServiceBusiness
        );
    }

    #[tokio::test]
    async fn low_rolls_detect_only_the_website() {
        let analysis = pinned(0.0)
            .inspect("https://citybank.com")
            .await
            .expect("mock never fails");

        assert_eq!(analysis.business_type, "Financial Services");
        assert_eq!(
            analysis.brand_description,
            "A financial institution providing monetary services and advice"
        );
        assert_eq!(analysis.platforms_detected, vec![Platform::Website]);
        assert_eq!(analysis.recommendations.len(), 3);
        assert_eq!(analysis.design_quality, 7);
    }

    #[tokio::test]
    async fn high_rolls_detect_every_platform() {
        let analysis = pinned(0.95)
            .inspect("https://cafe-luna.com")
            .await
            .expect("mock never fails");

        assert_eq!(analysis.business_type, "Restaurant/Food Service");
        assert_eq!(
            analysis.platforms_detected,
            vec![
                Platform::Website,
                Platform::Instagram,
                Platform::Facebook,
                Platform::LinkedIn,
                Platform::GoogleAds,
                Platform::EmailMarketing,
            ]
        );
    }

    #[test]
    fn fixed_ratings_stay_inside_the_requested_band() {
        let signals = FixedSignals {
            unit: 0.0,
            rating: 12,
        };
        assert_eq!(signals.rating(6, 9), 9);
    }

    #[tokio::test]
    async fn analyzer_reports_progress_and_success() {
        let analyzer = WebsiteAnalyzer::new(Arc::new(pinned(0.0)));
        let queue = NotificationQueue::default();

        let analysis = analyzer.analyze("https://shopify-store.com", &queue).await;
        assert_eq!(
            analysis.map(|analysis| analysis.business_type),
            Some("E-commerce".to_string())
        );

        let titles: Vec<_> = queue.drain().into_iter().map(|note| note.title).collect();
        assert_eq!(titles, vec!["Analyzing Website", "Analysis Complete"]);
    }

    #[tokio::test]
    async fn analyzer_swallows_failures_with_a_destructive_notice() {
        let analyzer = WebsiteAnalyzer::new(Arc::new(FailingInspector));
        let queue = NotificationQueue::default();

        assert!(analyzer.analyze("https://acme.com", &queue).await.is_none());
        let notes = queue.drain();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].title, "Analysis Failed");
        assert_eq!(notes[1].variant, NotificationVariant::Destructive);
    }

    #[tokio::test]
    async fn blank_url_skips_inspection() {
        let analyzer = WebsiteAnalyzer::new(Arc::new(FailingInspector));
        let queue = NotificationQueue::default();

        assert!(analyzer.analyze("   ", &queue).await.is_none());
        assert!(queue.drain().is_empty());
    }
}
