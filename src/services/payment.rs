use crate::models::Plan;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when interacting with the payment gateway
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Gateway error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Payment signature mismatch")]
    InvalidSignature,

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Order {0} is not paid")]
    OrderNotPaid(String),

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

/// Order as returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub receipt: Option<String>,
    /// Object of string notes; the gateway sends `[]` when there are none
    #[serde(default)]
    pub notes: Value,
}

impl GatewayOrder {
    /// Plan id recorded in the order notes at creation
    pub fn plan_id(&self) -> Option<&str> {
        self.notes.get("plan_id").and_then(Value::as_str)
    }

    /// User id recorded in the order notes at creation
    pub fn user_id(&self) -> Option<&str> {
        self.notes.get("user_id").and_then(Value::as_str)
    }

    /// Whether the gateway has captured payment for the order
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("paid")
    }
}

/// Razorpay orders client
pub struct RazorpayClient {
    endpoint: String,
    key_id: String,
    key_secret: String,
    currency: String,
    plans: Vec<Plan>,
    client: Client,
}

impl RazorpayClient {
    pub fn new(
        endpoint: String,
        key_id: String,
        key_secret: String,
        currency: String,
        plans: Vec<Plan>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            endpoint,
            key_id,
            key_secret,
            currency,
            plans,
            client,
        }
    }

    /// Public key id handed to the checkout widget
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn plan(&self, plan_id: &str) -> Result<&Plan, PaymentError> {
        self.plans
            .iter()
            .find(|p| p.id == plan_id)
            .ok_or_else(|| PaymentError::UnknownPlan(plan_id.to_string()))
    }

    /// Open an order for a plan on behalf of a user
    pub async fn create_order(&self, plan_id: &str, user_id: &str) -> Result<GatewayOrder, PaymentError> {
        let plan = self.plan(plan_id)?;
        let receipt = format!("rcpt_{}", uuid::Uuid::new_v4().simple());

        let body = json!({
            "amount": plan.amount,
            "currency": self.currency,
            "receipt": receipt,
            "notes": { "plan_id": plan.id, "user_id": user_id },
        });

        let url = format!("{}/orders", self.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        let order: GatewayOrder = Self::read(response).await?;
        tracing::info!("Created order {} for plan {} ({} {})", order.id, plan.id, order.amount, order.currency);
        Ok(order)
    }

    /// Fetch an existing order
    pub async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentError> {
        let url = format!(
            "{}/orders/{}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(order_id)
        );
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        Self::read(response).await
    }

    async fn read<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["description"].as_str().map(str::to_string))
                .unwrap_or(text);
            tracing::warn!("Payment gateway returned {}: {}", status, message);
            return Err(PaymentError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = response.json().await?;
        serde_json::from_value(value).map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }

    /// Check the checkout confirmation signature
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_hmac(
            &self.key_secret,
            &format!("{}|{}", order_id, payment_id),
            signature,
        )
    }
}

/// Lowercase hex HMAC-SHA256 of `payload`
pub fn sign(secret: &str, payload: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison of a hex HMAC-SHA256 signature
pub fn verify_hmac(secret: &str, payload: &str, signature: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plans() -> Vec<Plan> {
        vec![Plan {
            id: "gold".to_string(),
            name: "Gold".to_string(),
            amount: 99_900,
            duration_days: 90,
        }]
    }

    #[test]
    fn test_sign_known_vector() {
        assert_eq!(
            sign("key", "The quick brown fox jumps over the lazy dog"),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_verify_signature() {
        let client = RazorpayClient::new(
            "https://api.razorpay.test/v1".to_string(),
            "rzp_test".to_string(),
            "secret".to_string(),
            "INR".to_string(),
            plans(),
        );

        let good = sign("secret", "order_1|pay_1");
        assert!(client.verify_signature("order_1", "pay_1", &good));
        assert!(client.verify_signature("order_1", "pay_1", &good.to_uppercase()));
        assert!(!client.verify_signature("order_1", "pay_2", &good));
        assert!(!client.verify_signature("order_1", "pay_1", "not-hex"));
        assert!(!client.verify_signature("order_1", "pay_1", ""));
    }

    #[test]
    fn test_order_notes() {
        let order: GatewayOrder = serde_json::from_value(json!({
            "id": "order_1",
            "amount": 99900,
            "currency": "INR",
            "notes": { "plan_id": "gold", "user_id": "u1" }
        }))
        .unwrap();
        assert_eq!(order.plan_id(), Some("gold"));
        assert_eq!(order.user_id(), Some("u1"));

        let bare: GatewayOrder = serde_json::from_value(json!({
            "id": "order_2",
            "amount": 100,
            "currency": "INR",
            "notes": []
        }))
        .unwrap();
        assert_eq!(bare.plan_id(), None);
        assert!(!bare.is_paid());
    }

    #[test]
    fn test_plan_lookup() {
        let client = RazorpayClient::new(
            "https://api.razorpay.test/v1".to_string(),
            "rzp_test".to_string(),
            "secret".to_string(),
            "INR".to_string(),
            plans(),
        );

        assert_eq!(client.plan("gold").unwrap().amount, 99_900);
        assert!(matches!(client.plan("platinum"), Err(PaymentError::UnknownPlan(_))));
    }

    #[test]
    fn test_blank_secret_never_verifies() {
        let forged = sign("", "order_1|pay_1");
        assert!(!verify_hmac("", "order_1|pay_1", &forged));
    }
}
