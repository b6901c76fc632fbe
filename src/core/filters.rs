use crate::models::{AdminFilter, MatrimonialProfile};
use chrono::{DateTime, Utc};

/// Check if a candidate may be shown to the viewer while browsing
///
/// Excludes the viewer, inactive profiles, anyone already liked or disliked,
/// and (for male/female viewers) profiles of the viewer's own gender.
#[inline]
pub fn is_browsable(candidate: &MatrimonialProfile, viewer: &MatrimonialProfile) -> bool {
    if candidate.user_id == viewer.user_id || !candidate.is_active {
        return false;
    }

    if viewer.has_liked(&candidate.user_id) || viewer.has_disliked(&candidate.user_id) {
        return false;
    }

    if let Some(wanted) = opposite_gender(&viewer.gender) {
        if !candidate.gender.eq_ignore_ascii_case(wanted) {
            return false;
        }
    }

    true
}

/// The gender shown to a viewer by default, when one applies
pub fn opposite_gender(gender: &str) -> Option<&'static str> {
    match gender.to_ascii_lowercase().as_str() {
        "male" => Some("female"),
        "female" => Some("male"),
        _ => None,
    }
}

/// Check a profile against the admin listing filter
#[inline]
pub fn matches_admin_filter(
    profile: &MatrimonialProfile,
    filter: &AdminFilter,
    now: DateTime<Utc>,
) -> bool {
    if let Some(gender) = &filter.gender {
        if !profile.gender.eq_ignore_ascii_case(gender) {
            return false;
        }
    }

    if let Some(subscribed) = filter.subscribed {
        if profile.is_subscribed(now) != subscribed {
            return false;
        }
    }

    if let Some(active) = filter.active {
        if profile.is_active != active {
            return false;
        }
    }

    match filter.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => matches_search(profile, term),
        _ => true,
    }
}

/// Case-insensitive search over name, email, city and profession
fn matches_search(profile: &MatrimonialProfile, term: &str) -> bool {
    let term = term.to_lowercase();

    [
        Some(profile.name.as_str()),
        Some(profile.email.as_str()),
        profile.city.as_deref(),
        profile.profession.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&term))
}

/// Whether the profile may record another like
///
/// Subscribers are unlimited; free profiles stop at `free_like_limit`.
#[inline]
pub fn within_like_allowance(
    profile: &MatrimonialProfile,
    free_like_limit: usize,
    now: DateTime<Utc>,
) -> bool {
    profile.is_subscribed(now) || profile.liked_profiles.len() < free_like_limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Subscription, SubscriptionStatus};
    use chrono::Duration;

    fn profile(id: &str, gender: &str) -> MatrimonialProfile {
        serde_json::from_value(serde_json::json!({
            "userId": id,
            "name": format!("User {}", id),
            "email": format!("{}@example.com", id),
            "gender": gender,
            "age": 28,
            "city": "Lucknow",
            "profession": "Architect"
        }))
        .unwrap()
    }

    fn subscribe(p: &mut MatrimonialProfile) {
        let now = Utc::now();
        p.subscription = Some(Subscription {
            plan: "gold".to_string(),
            status: SubscriptionStatus::Active,
            payment_id: "pay_1".to_string(),
            activated_at: now,
            expires_at: now + Duration::days(30),
        });
    }

    #[test]
    fn test_browse_excludes_self_and_same_gender() {
        let viewer = profile("me", "male");

        assert!(!is_browsable(&viewer, &viewer));
        assert!(!is_browsable(&profile("b", "male"), &viewer));
        assert!(is_browsable(&profile("c", "Female"), &viewer));
    }

    #[test]
    fn test_browse_excludes_seen_and_inactive() {
        let mut viewer = profile("me", "female");
        viewer.liked_profiles.push("liked".to_string());
        viewer.disliked_profiles.push("passed".to_string());

        let mut inactive = profile("gone", "male");
        inactive.is_active = false;

        assert!(!is_browsable(&profile("liked", "male"), &viewer));
        assert!(!is_browsable(&profile("passed", "male"), &viewer));
        assert!(!is_browsable(&inactive, &viewer));
        assert!(is_browsable(&profile("new", "male"), &viewer));
    }

    #[test]
    fn test_unspecified_gender_sees_everyone() {
        let viewer = profile("me", "other");

        assert!(is_browsable(&profile("a", "male"), &viewer));
        assert!(is_browsable(&profile("b", "female"), &viewer));
    }

    #[test]
    fn test_admin_filter() {
        let now = Utc::now();
        let mut paid = profile("paid", "female");
        subscribe(&mut paid);
        let free = profile("free", "male");

        let only_subscribed = AdminFilter { subscribed: Some(true), ..Default::default() };
        assert!(matches_admin_filter(&paid, &only_subscribed, now));
        assert!(!matches_admin_filter(&free, &only_subscribed, now));

        let by_gender = AdminFilter { gender: Some("MALE".to_string()), ..Default::default() };
        assert!(matches_admin_filter(&free, &by_gender, now));
        assert!(!matches_admin_filter(&paid, &by_gender, now));

        let search = AdminFilter { search: Some("architect".to_string()), ..Default::default() };
        assert!(matches_admin_filter(&free, &search, now));

        let search = AdminFilter { search: Some("mumbai".to_string()), ..Default::default() };
        assert!(!matches_admin_filter(&free, &search, now));

        assert!(matches_admin_filter(&free, &AdminFilter::default(), now));
    }

    #[test]
    fn test_like_allowance() {
        let now = Utc::now();
        let mut p = profile("me", "male");
        p.liked_profiles = vec!["a".to_string(), "b".to_string()];

        assert!(!within_like_allowance(&p, 2, now));
        assert!(within_like_allowance(&p, 3, now));

        subscribe(&mut p);
        assert!(within_like_allowance(&p, 2, now));
    }
}
