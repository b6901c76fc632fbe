// Service exports
pub mod appwrite;
pub mod cache;
pub mod events;
pub mod gemini;
pub mod identity;
pub mod payment;
pub mod profiles;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError, DocumentList, Query};
pub use cache::{CacheManager, CacheKey, CacheError, CacheStats};
pub use events::{ChangeFeed, ChangeKind, ProfileChange, Subscription};
pub use gemini::{GeminiClient, GeminiError};
pub use identity::{AuthError, Claims, Identity, IdentityVerifier};
pub use payment::{GatewayOrder, PaymentError, RazorpayClient};
pub use profiles::{ProfileError, ProfileService};
