use serde::{Deserialize, Serialize};
use crate::models::domain::{MatrimonialProfile, Subscription, SuggestedMatch};

/// Parsed suggestions for rendering as cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedSuggestionsResponse {
    pub matches: Vec<SuggestedMatch>,
    pub total_results: usize,
}

/// Public view of a profile shown to other users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCard {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub gender: String,
    pub age: u8,
    pub religion: Option<String>,
    pub community: Option<String>,
    pub city: Option<String>,
    pub education: Option<String>,
    pub profession: Option<String>,
    #[serde(rename = "heightCm")]
    pub height_cm: Option<u16>,
    pub about: Option<String>,
    #[serde(rename = "photoUrl")]
    pub photo_url: Option<String>,
}

impl From<MatrimonialProfile> for ProfileCard {
    fn from(p: MatrimonialProfile) -> Self {
        Self {
            user_id: p.user_id,
            name: p.name,
            gender: p.gender,
            age: p.age,
            religion: p.religion,
            community: p.community,
            city: p.city,
            education: p.education,
            profession: p.profession,
            height_cm: p.height_cm,
            about: p.about,
            photo_url: p.photo_url,
        }
    }
}

/// Response for the browse endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseResponse {
    pub profiles: Vec<ProfileCard>,
    pub total_results: usize,
}

/// Like/dislike response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub success: bool,
    pub mutual: bool,
}

/// Payment order handed to the checkout widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(rename = "keyId")]
    pub key_id: String,
}

/// Payment verification response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub subscription: Subscription,
}

/// Admin listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfilesResponse {
    pub profiles: Vec<MatrimonialProfile>,
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: CacheHealth,
    pub change_subscribers: usize,
}

/// Cache tier status reported by the health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHealth {
    pub l1_entries: u64,
    pub redis_enabled: bool,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
