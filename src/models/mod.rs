// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchRequest, MatchSuggestions, SuggestedMatch, MatrimonialProfile, Subscription, SubscriptionStatus, Plan, LikeOutcome, AdminFilter};
pub use requests::{SuggestMatchesRequest, CreateProfileRequest, UpdateProfileRequest, BrowseQuery, CreateOrderRequest, VerifyPaymentRequest};
pub use responses::{ParsedSuggestionsResponse, ProfileCard, BrowseResponse, LikeResponse, OrderResponse, VerifyPaymentResponse, AdminProfilesResponse, CacheHealth, HealthResponse, ErrorResponse};
