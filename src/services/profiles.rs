use crate::core::{filters, likes};
use crate::models::{
    AdminFilter, CreateProfileRequest, LikeOutcome, MatrimonialProfile, Plan, Subscription,
    SubscriptionStatus, UpdateProfileRequest,
};
use crate::services::appwrite::{AppwriteClient, AppwriteError, Query};
use crate::services::cache::{CacheKey, CacheManager};
use crate::services::events::{ChangeFeed, ChangeKind, ProfileChange};
use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Errors from profile operations
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Document store error: {0}")]
    Store(AppwriteError),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Profile already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Free plan allows {0} likes; subscribe for more")]
    LikeLimitReached(usize),
}

impl From<AppwriteError> for ProfileError {
    fn from(err: AppwriteError) -> Self {
        match err {
            AppwriteError::NotFound(what) => ProfileError::NotFound(what),
            AppwriteError::Conflict(what) => ProfileError::AlreadyExists(what),
            other => ProfileError::Store(other),
        }
    }
}

/// Profile bookkeeping over the document store
///
/// Reads go through the profile cache. Every mutation evicts the cached
/// copy and publishes a change on the feed.
pub struct ProfileService {
    appwrite: Arc<AppwriteClient>,
    cache: Arc<CacheManager>,
    feed: ChangeFeed,
    free_like_limit: usize,
    admin_page_size: usize,
}

impl ProfileService {
    pub fn new(
        appwrite: Arc<AppwriteClient>,
        cache: Arc<CacheManager>,
        feed: ChangeFeed,
        free_like_limit: usize,
        admin_page_size: usize,
    ) -> Self {
        Self {
            appwrite,
            cache,
            feed,
            free_like_limit,
            admin_page_size,
        }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    fn collection(&self) -> &str {
        &self.appwrite.collections().profiles
    }

    async fn changed(&self, user_id: &str, kind: ChangeKind) {
        if let Err(e) = self.cache.delete(&CacheKey::profile(user_id)).await {
            tracing::warn!("Failed to invalidate cached profile {}: {}", user_id, e);
        }
        self.feed.publish(ProfileChange::new(user_id, kind));
    }

    /// Fetch a profile, reading through the cache
    pub async fn get_profile(&self, user_id: &str) -> Result<MatrimonialProfile, ProfileError> {
        let key = CacheKey::profile(user_id);
        if let Ok(profile) = self.cache.get::<MatrimonialProfile>(&key).await {
            return Ok(profile);
        }

        let profile: MatrimonialProfile = self
            .appwrite
            .get_document(self.collection(), user_id)
            .await
            .map_err(|e| match e {
                AppwriteError::NotFound(_) => ProfileError::NotFound(user_id.to_string()),
                other => ProfileError::from(other),
            })?;

        if let Err(e) = self.cache.set(&key, &profile).await {
            tracing::warn!("Failed to cache profile {}: {}", user_id, e);
        }

        Ok(profile)
    }

    /// Create the profile document for a user
    pub async fn create_profile(
        &self,
        user_id: &str,
        req: CreateProfileRequest,
    ) -> Result<MatrimonialProfile, ProfileError> {
        let profile = MatrimonialProfile {
            user_id: user_id.to_string(),
            name: req.name,
            email: req.email,
            gender: req.gender.to_lowercase(),
            age: req.age,
            religion: req.religion,
            community: req.community,
            mother_tongue: req.mother_tongue,
            city: req.city,
            education: req.education,
            profession: req.profession,
            height_cm: req.height_cm,
            about: req.about,
            partner_preferences: req.partner_preferences,
            photo_url: req.photo_url,
            liked_profiles: vec![],
            disliked_profiles: vec![],
            subscription: None,
            is_active: true,
            created_at: Some(Utc::now()),
        };

        let created: MatrimonialProfile = self
            .appwrite
            .create_document(self.collection(), user_id, &profile)
            .await
            .map_err(|e| match e {
                AppwriteError::Conflict(_) => ProfileError::AlreadyExists(user_id.to_string()),
                other => ProfileError::from(other),
            })?;

        tracing::info!("Created profile for user {}", user_id);
        self.changed(user_id, ChangeKind::Created).await;

        Ok(created)
    }

    /// Apply a partial update
    pub async fn update_profile(
        &self,
        user_id: &str,
        req: &UpdateProfileRequest,
    ) -> Result<MatrimonialProfile, ProfileError> {
        let updated: MatrimonialProfile = self
            .appwrite
            .update_document(self.collection(), user_id, req)
            .await?;

        self.changed(user_id, ChangeKind::Updated).await;
        Ok(updated)
    }

    pub async fn delete_profile(&self, user_id: &str) -> Result<(), ProfileError> {
        self.appwrite.delete_document(self.collection(), user_id).await?;

        tracing::info!("Deleted profile for user {}", user_id);
        self.changed(user_id, ChangeKind::Deleted).await;
        Ok(())
    }

    /// Profiles the viewer has not yet liked or passed on
    pub async fn browse(&self, viewer_id: &str, limit: usize) -> Result<Vec<MatrimonialProfile>, ProfileError> {
        let viewer = self.get_profile(viewer_id).await?;

        let seen = viewer.liked_profiles.len() + viewer.disliked_profiles.len();
        let mut queries = vec![
            Query::equal("isActive", true),
            Query::not_equal("userId", viewer_id),
            Query::order_desc("$createdAt"),
            Query::limit((limit + seen).min(500)),
        ];
        if let Some(gender) = filters::opposite_gender(&viewer.gender) {
            queries.push(Query::equal("gender", gender));
        }

        let page = self
            .appwrite
            .list_documents::<MatrimonialProfile>(self.collection(), &queries)
            .await?;

        let mut profiles: Vec<MatrimonialProfile> = page
            .documents
            .into_iter()
            .filter(|candidate| filters::is_browsable(candidate, &viewer))
            .collect();
        profiles.truncate(limit);

        tracing::debug!("Browse for {}: {} profiles (store total: {})", viewer_id, profiles.len(), page.total);

        Ok(profiles)
    }

    async fn load_pair(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> Result<(MatrimonialProfile, MatrimonialProfile), ProfileError> {
        if user_id == target_id {
            return Err(ProfileError::InvalidTarget("cannot react to your own profile".into()));
        }

        let actor = self.get_profile(user_id).await?;
        let target = match self.get_profile(target_id).await {
            Ok(target) => target,
            Err(ProfileError::NotFound(_)) => {
                return Err(ProfileError::InvalidTarget(format!("no profile {}", target_id)))
            }
            Err(e) => return Err(e),
        };

        Ok((actor, target))
    }

    async fn save_reactions(&self, actor: &MatrimonialProfile) -> Result<(), ProfileError> {
        let payload = json!({
            "likedProfiles": actor.liked_profiles,
            "dislikedProfiles": actor.disliked_profiles,
        });

        let _: MatrimonialProfile = self
            .appwrite
            .update_document(self.collection(), &actor.user_id, &payload)
            .await?;

        self.changed(&actor.user_id, ChangeKind::Updated).await;
        Ok(())
    }

    /// Like a profile; reports whether the like is mutual
    pub async fn like(&self, user_id: &str, target_id: &str) -> Result<LikeOutcome, ProfileError> {
        let (mut actor, target) = self.load_pair(user_id, target_id).await?;

        if !actor.has_liked(target_id) && !filters::within_like_allowance(&actor, self.free_like_limit, Utc::now()) {
            return Err(ProfileError::LikeLimitReached(self.free_like_limit));
        }

        if likes::record_like(&mut actor, target_id) {
            self.save_reactions(&actor).await?;
        }

        let mutual = likes::is_mutual(&actor, &target);
        tracing::info!("User {} liked {} (mutual: {})", user_id, target_id, mutual);

        Ok(LikeOutcome { mutual })
    }

    pub async fn dislike(&self, user_id: &str, target_id: &str) -> Result<(), ProfileError> {
        let (mut actor, _) = self.load_pair(user_id, target_id).await?;

        if likes::record_dislike(&mut actor, target_id) {
            self.save_reactions(&actor).await?;
        }

        tracing::info!("User {} passed on {}", user_id, target_id);
        Ok(())
    }

    /// Start a paid subscription after a verified payment.
    ///
    /// A payment is redeemed once: repeating it returns the subscription it
    /// already started.
    pub async fn activate_subscription(
        &self,
        user_id: &str,
        plan: &Plan,
        payment_id: &str,
    ) -> Result<Subscription, ProfileError> {
        let profile = self.get_profile(user_id).await?;
        if let Some(existing) = profile.subscription.filter(|s| s.payment_id == payment_id) {
            tracing::info!("Payment {} already redeemed by {}", payment_id, user_id);
            return Ok(existing);
        }

        let now = Utc::now();
        let subscription = Subscription {
            plan: plan.id.clone(),
            status: SubscriptionStatus::Active,
            payment_id: payment_id.to_string(),
            activated_at: now,
            expires_at: now + Duration::days(plan.duration_days as i64),
        };

        let updated: MatrimonialProfile = self
            .appwrite
            .update_document(self.collection(), user_id, &json!({ "subscription": subscription }))
            .await?;

        tracing::info!("Activated {} subscription for {} until {}", plan.id, user_id, subscription.expires_at);
        self.changed(user_id, ChangeKind::Updated).await;

        if let Err(e) = self.cache.set(&CacheKey::profile(user_id), &updated).await {
            tracing::warn!("Failed to cache profile {}: {}", user_id, e);
        }

        Ok(subscription)
    }

    /// Admin: toggle whether a profile is visible
    pub async fn set_active(&self, user_id: &str, active: bool) -> Result<MatrimonialProfile, ProfileError> {
        let updated: MatrimonialProfile = self
            .appwrite
            .update_document(self.collection(), user_id, &json!({ "isActive": active }))
            .await?;

        tracing::info!("Set profile {} active={}", user_id, active);
        self.changed(user_id, ChangeKind::Updated).await;
        Ok(updated)
    }

    /// Admin: filtered profile listing
    ///
    /// Gender and active status are pushed into the store query; the
    /// remaining filters run over every page of the result.
    pub async fn list_profiles(&self, filter: &AdminFilter) -> Result<Vec<MatrimonialProfile>, ProfileError> {
        let mut base = vec![Query::order_desc("$createdAt")];
        if let Some(gender) = &filter.gender {
            base.push(Query::equal("gender", gender.to_lowercase()));
        }
        if let Some(active) = filter.active {
            base.push(Query::equal("isActive", active));
        }

        let page_size = self.admin_page_size.max(1);
        let now = Utc::now();
        let mut matched = Vec::new();
        let mut offset = 0;

        loop {
            let mut queries = base.clone();
            queries.push(Query::limit(page_size));
            queries.push(Query::offset(offset));

            let page = self
                .appwrite
                .list_documents::<MatrimonialProfile>(self.collection(), &queries)
                .await?;

            matched.extend(
                page.documents
                    .into_iter()
                    .filter(|p| filters::matches_admin_filter(p, filter, now)),
            );

            offset += page_size;
            if offset as u64 >= page.total {
                break;
            }
        }

        tracing::debug!("Admin listing matched {} profiles", matched.len());
        Ok(matched)
    }
}
