use crate::models::Plan;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub matchmaking: MatchmakingSettings,
    pub payment: PaymentSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub profiles: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Redis is optional; without it only the in-process tier is used
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_gemini_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_gemini_model() -> String { "gemini-1.5-flash".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchmakingSettings {
    #[serde(default = "default_criteria")]
    pub default_criteria: String,
    #[serde(default = "default_browse_limit")]
    pub max_browse_limit: u16,
    #[serde(default = "default_free_like_limit")]
    pub free_like_limit: usize,
    #[serde(default = "default_admin_page_size")]
    pub admin_page_size: usize,
}

impl Default for MatchmakingSettings {
    fn default() -> Self {
        Self {
            default_criteria: default_criteria(),
            max_browse_limit: default_browse_limit(),
            free_like_limit: default_free_like_limit(),
            admin_page_size: default_admin_page_size(),
        }
    }
}

fn default_criteria() -> String { crate::core::DEFAULT_MATCHING_CRITERIA.to_string() }
fn default_browse_limit() -> u16 { 50 }
fn default_free_like_limit() -> usize { 10 }
fn default_admin_page_size() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_payment_endpoint")]
    pub endpoint: String,
    pub key_id: String,
    pub key_secret: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_plans")]
    pub plans: Vec<Plan>,
}

fn default_payment_endpoint() -> String { "https://api.razorpay.com/v1".to_string() }
fn default_currency() -> String { "INR".to_string() }

fn default_plans() -> Vec<Plan> {
    vec![
        Plan { id: "silver".to_string(), name: "Silver".to_string(), amount: 49_900, duration_days: 30 },
        Plan { id: "gold".to_string(), name: "Gold".to_string(), amount: 119_900, duration_days: 90 },
        Plan { id: "platinum".to_string(), name: "Platinum".to_string(), amount: 399_900, duration_days: 365 },
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

fn environment() -> Environment {
    // e.g., VIVAH__SERVER__PORT -> server.port
    Environment::with_prefix("VIVAH")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("auth.admin_emails")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VIVAH__)
    /// 5. Well-known secret variables (GEMINI_API_KEY, RAZORPAY_KEY_ID, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        apply_secret_overrides(settings)?
            .try_deserialize::<Settings>()?
            .require_secrets()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>()?.require_secrets()
    }

    /// Refuse to start with blank signing secrets
    fn require_secrets(self) -> Result<Self, ConfigError> {
        let required = [
            ("auth.jwt_secret", "JWT_SECRET", &self.auth.jwt_secret),
            ("payment.key_secret", "RAZORPAY_KEY_SECRET", &self.payment.key_secret),
        ];

        for (key, var, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{} must be set (or {})", key, var)));
            }
        }

        Ok(self)
    }
}

/// Secrets conventionally provided under their vendor names
const SECRET_OVERRIDES: &[(&str, &str)] = &[
    ("GEMINI_API_KEY", "gemini.api_key"),
    ("APPWRITE_ENDPOINT", "appwrite.endpoint"),
    ("APPWRITE_API_KEY", "appwrite.api_key"),
    ("APPWRITE_PROJECT_ID", "appwrite.project_id"),
    ("RAZORPAY_KEY_ID", "payment.key_id"),
    ("RAZORPAY_KEY_SECRET", "payment.key_secret"),
    ("JWT_SECRET", "auth.jwt_secret"),
    ("REDIS_URL", "cache.redis_url"),
];

fn apply_secret_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in SECRET_OVERRIDES {
        if let Ok(value) = std::env::var(var) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}
