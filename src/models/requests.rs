use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::MatchRequest;

/// Request for AI match suggestions
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SuggestMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "profile_details", rename = "profileDetails")]
    pub profile_details: String,
    #[serde(default)]
    #[serde(alias = "matching_criteria", rename = "matchingCriteria")]
    pub matching_criteria: String,
}

impl From<SuggestMatchesRequest> for MatchRequest {
    fn from(req: SuggestMatchesRequest) -> Self {
        MatchRequest::new(req.profile_details, req.matching_criteria)
    }
}

/// Request to create the caller's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub gender: String,
    #[validate(range(min = 18, max = 100))]
    pub age: u8,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default, rename = "motherTongue")]
    pub mother_tongue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[validate(range(min = 100, max = 250))]
    #[serde(default, rename = "heightCm")]
    pub height_cm: Option<u16>,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub about: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(default, rename = "partnerPreferences")]
    pub partner_preferences: Option<String>,
    #[validate(url)]
    #[serde(default, rename = "photoUrl")]
    pub photo_url: Option<String>,
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(range(min = 18, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default, rename = "motherTongue", skip_serializing_if = "Option::is_none")]
    pub mother_tongue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[validate(range(min = 100, max = 250))]
    #[serde(default, rename = "heightCm", skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<u16>,
    #[validate(length(max = 2000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(default, rename = "partnerPreferences", skip_serializing_if = "Option::is_none")]
    pub partner_preferences: Option<String>,
    #[validate(url)]
    #[serde(default, rename = "photoUrl", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_object().map(|o| o.is_empty()))
            .unwrap_or(true)
    }
}

/// Browse query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseQuery {
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

/// Request to open a payment order for a plan
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "plan_id", rename = "planId")]
    pub plan_id: String,
}

/// Signed confirmation payload returned by the payment gateway checkout
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "razorpay_order_id", rename = "orderId")]
    pub order_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "razorpay_payment_id", rename = "paymentId")]
    pub payment_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "razorpay_signature", rename = "signature")]
    pub signature: String,
}
