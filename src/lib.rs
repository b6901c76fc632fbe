//! Vivah Match - matchmaking service for the Vivah matrimonial app
//!
//! Profiles, likes, subscriptions and an admin listing sit on top of a
//! hosted document store and payment gateway. The AI suggestion flow sends
//! a templated prompt to a generative model and parses its free-text reply
//! into match cards.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matchmaker, SuggestionBackend, BackendError, parser::{parse_suggestions, suggestions}};
pub use models::{MatchRequest, MatchSuggestions, SuggestedMatch, MatrimonialProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let records = parse_suggestions(Some("Riya Kapoor (91/100) Shared love of travel."));
        assert_eq!(records[0].compatibility_score, 91);
    }
}
