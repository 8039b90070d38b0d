use serde::Serialize;

/// Recommendation band chosen from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Growth,
    Consultation,
    Urgent,
}

/// Follow-up pitch shown above the contact buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactPitch {
    pub title: &'static str,
    pub message: &'static str,
    pub call_to_action: &'static str,
}

impl RecommendationTier {
    pub const GROWTH_THRESHOLD: u16 = 80;
    pub const CONSULTATION_THRESHOLD: u16 = 60;

    pub const fn for_score(score: u16) -> Self {
        if score >= Self::GROWTH_THRESHOLD {
            Self::Growth
        } else if score >= Self::CONSULTATION_THRESHOLD {
            Self::Consultation
        } else {
            Self::Urgent
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Growth => "Excellent Brand Foundation!",
            Self::Consultation => "Good Foundation with Growth Potential",
            Self::Urgent => "Brand Enhancement Needed",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Growth => {
                "Your brand is performing well. Let's discuss scaling strategies to maximize your potential."
            }
            Self::Consultation => {
                "Your brand has solid elements but there's room for improvement. Let's discuss how to elevate your brand."
            }
            Self::Urgent => {
                "Your brand needs strategic attention. A comprehensive brand consultation would be highly beneficial."
            }
        }
    }

    /// Action tag used by the follow-up flow.
    pub const fn action(self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Consultation => "consultation",
            Self::Urgent => "urgent",
        }
    }

    pub const fn contact_pitch(self) -> ContactPitch {
        match self {
            Self::Growth => ContactPitch {
                title: "Ready to Scale Your Success?",
                message: "Your brand is performing excellently! Let's discuss advanced strategies to maximize your growth potential and market dominance.",
                call_to_action: "Schedule a Growth Strategy Session",
            },
            Self::Consultation => ContactPitch {
                title: "Let's Elevate Your Brand",
                message: "Your brand has solid foundations with great potential. We can help you identify and implement the improvements that will drive significant growth.",
                call_to_action: "Book a Brand Enhancement Consultation",
            },
            Self::Urgent => ContactPitch {
                title: "Transform Your Brand Today",
                message: "Your brand needs strategic attention to reach its full potential. Our comprehensive brand consultation will provide the roadmap for transformation.",
                call_to_action: "Schedule an Urgent Brand Consultation",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        assert_eq!(RecommendationTier::for_score(12), RecommendationTier::Urgent);
        assert_eq!(RecommendationTier::for_score(59), RecommendationTier::Urgent);
        assert_eq!(RecommendationTier::for_score(60), RecommendationTier::Consultation);
        assert_eq!(RecommendationTier::for_score(79), RecommendationTier::Consultation);
        assert_eq!(RecommendationTier::for_score(80), RecommendationTier::Growth);
        assert_eq!(RecommendationTier::for_score(128), RecommendationTier::Growth);
    }

    #[test]
    fn each_tier_has_its_own_pitch() {
        assert_eq!(
            RecommendationTier::Urgent.contact_pitch().call_to_action,
            "Schedule an Urgent Brand Consultation"
        );
        assert_eq!(RecommendationTier::Consultation.action(), "consultation");
        assert_eq!(
            RecommendationTier::Growth.contact_pitch().title,
            "Ready to Scale Your Success?"
        );
    }
}
