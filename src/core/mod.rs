// Core algorithm exports
pub mod filters;
pub mod likes;
pub mod matchmaker;
pub mod parser;
pub mod prompt;

pub use filters::{is_browsable, matches_admin_filter, within_like_allowance};
pub use likes::{record_like, record_dislike, is_mutual};
pub use matchmaker::{BackendError, Matchmaker, SuggestionBackend};
pub use parser::{extract_name, extract_score, parse_suggestions, suggestions};
pub use prompt::{describe_profile, render_prompt, DEFAULT_MATCHING_CRITERIA};
