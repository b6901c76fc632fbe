use serde::{Deserialize, Serialize};

/// Free-text input to the suggestion backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(rename = "profileDetails")]
    pub profile_details: String,
    #[serde(rename = "matchingCriteria", default)]
    pub matching_criteria: String,
}

impl MatchRequest {
    pub fn new(profile_details: impl Into<String>, matching_criteria: impl Into<String>) -> Self {
        Self {
            profile_details: profile_details.into(),
            matching_criteria: matching_criteria.into(),
        }
    }

    /// Replace blank criteria with the given default description
    pub fn with_default_criteria(mut self, default_criteria: &str) -> Self {
        if self.matching_criteria.trim().is_empty() {
            self.matching_criteria = default_criteria.to_string();
        }
        self
    }
}

/// Raw model output: one free-text block of suggested matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSuggestions {
    #[serde(rename = "suggestedMatches")]
    pub suggested_matches: String,
}

/// Best-effort record parsed from one line of model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedMatch {
    pub id: String,
    pub name: String,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u32,
    pub bio: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Matrimonial profile as stored in the profiles collection.
///
/// The document id is the owner's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrimonialProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: u8,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(rename = "motherTongue", default)]
    pub mother_tongue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(rename = "heightCm", default)]
    pub height_cm: Option<u16>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(rename = "partnerPreferences", default)]
    pub partner_preferences: Option<String>,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
    #[serde(rename = "likedProfiles", default)]
    pub liked_profiles: Vec<String>,
    #[serde(rename = "dislikedProfiles", default)]
    pub disliked_profiles: Vec<String>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl MatrimonialProfile {
    /// Whether the profile holds a paid subscription that has not expired
    pub fn is_subscribed(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.subscription
            .as_ref()
            .map(|s| s.status == SubscriptionStatus::Active && s.expires_at > now)
            .unwrap_or(false)
    }

    pub fn has_liked(&self, user_id: &str) -> bool {
        self.liked_profiles.iter().any(|id| id == user_id)
    }

    pub fn has_disliked(&self, user_id: &str) -> bool {
        self.disliked_profiles.iter().any(|id| id == user_id)
    }
}

fn default_true() -> bool { true }

/// Paid plan attached to a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: String,
    pub status: SubscriptionStatus,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
    #[serde(rename = "activatedAt")]
    pub activated_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

/// A purchasable subscription plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    /// Price in the smallest currency unit (paise)
    pub amount: u64,
    pub duration_days: u32,
}

/// Outcome of a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub mutual: bool,
}

/// Filters for the admin profile listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminFilter {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub subscribed: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
}
