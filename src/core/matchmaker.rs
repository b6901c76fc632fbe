use crate::core::parser::parse_suggestions;
use crate::core::prompt::{request_for_profile, DEFAULT_MATCHING_CRITERIA};
use crate::models::{MatchRequest, MatchSuggestions, MatrimonialProfile, SuggestedMatch};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failures of the generative suggestion backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Suggestion backend unavailable: {0}")]
    Unavailable(String),

    #[error("Suggestion backend quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Schema validation failed: {0}")]
    SchemaViolation(String),
}

/// A generative text backend taking a match request and returning free text
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    async fn suggest(&self, request: &MatchRequest) -> Result<MatchSuggestions, BackendError>;
}

/// Input schema check shared by backends: both fields present and non-blank
pub fn validate_request(request: &MatchRequest) -> Result<(), BackendError> {
    if request.profile_details.trim().is_empty() {
        return Err(BackendError::SchemaViolation("profileDetails must not be empty".into()));
    }
    if request.matching_criteria.trim().is_empty() {
        return Err(BackendError::SchemaViolation("matchingCriteria must not be empty".into()));
    }
    Ok(())
}

/// Suggestion orchestrator
///
/// Fills in default criteria, calls the backend once, and optionally parses
/// the reply into records. Holds no per-request state, so concurrent calls
/// are independent.
#[derive(Clone)]
pub struct Matchmaker {
    backend: Arc<dyn SuggestionBackend>,
    default_criteria: String,
}

impl Matchmaker {
    pub fn new(backend: Arc<dyn SuggestionBackend>, default_criteria: impl Into<String>) -> Self {
        Self {
            backend,
            default_criteria: default_criteria.into(),
        }
    }

    pub fn with_default_criteria(backend: Arc<dyn SuggestionBackend>) -> Self {
        Self::new(backend, DEFAULT_MATCHING_CRITERIA)
    }

    pub fn default_criteria(&self) -> &str {
        &self.default_criteria
    }

    /// Ask the backend for suggestions, returning its raw text.
    ///
    /// Blank profile details are refused before the backend is called.
    /// Backend errors are passed through untouched; there is no retry.
    pub async fn find_suggestions(&self, request: MatchRequest) -> Result<MatchSuggestions, BackendError> {
        let request = request.with_default_criteria(&self.default_criteria);
        validate_request(&request)?;

        tracing::debug!(
            "Requesting suggestions (profile: {} chars, criteria: {} chars)",
            request.profile_details.len(),
            request.matching_criteria.len()
        );

        self.backend.suggest(&request).await
    }

    /// Ask the backend for suggestions and parse them into records
    pub async fn suggest_matches(&self, request: MatchRequest) -> Result<Vec<SuggestedMatch>, BackendError> {
        let suggestions = self.find_suggestions(request).await?;
        let matches = parse_suggestions(Some(&suggestions.suggested_matches));

        tracing::debug!("Parsed {} suggested matches", matches.len());

        Ok(matches)
    }

    /// Suggest matches for a stored profile
    pub async fn suggest_for_profile(&self, profile: &MatrimonialProfile) -> Result<Vec<SuggestedMatch>, BackendError> {
        self.suggest_matches(request_for_profile(profile)).await
    }
}
