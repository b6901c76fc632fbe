use crate::models::MatrimonialProfile;

/// Record a like on the actor's document.
///
/// Adds the target to `likedProfiles` once and drops it from
/// `dislikedProfiles`. Returns whether anything changed.
pub fn record_like(actor: &mut MatrimonialProfile, target_id: &str) -> bool {
    let removed = remove_id(&mut actor.disliked_profiles, target_id);
    let added = add_id(&mut actor.liked_profiles, target_id);
    removed || added
}

/// Record a dislike on the actor's document; the mirror of [`record_like`]
pub fn record_dislike(actor: &mut MatrimonialProfile, target_id: &str) -> bool {
    let removed = remove_id(&mut actor.liked_profiles, target_id);
    let added = add_id(&mut actor.disliked_profiles, target_id);
    removed || added
}

/// Whether two profiles like each other
pub fn is_mutual(actor: &MatrimonialProfile, target: &MatrimonialProfile) -> bool {
    actor.has_liked(&target.user_id) && target.has_liked(&actor.user_id)
}

fn add_id(ids: &mut Vec<String>, id: &str) -> bool {
    if ids.iter().any(|existing| existing == id) {
        return false;
    }
    ids.push(id.to_string());
    true
}

fn remove_id(ids: &mut Vec<String>, id: &str) -> bool {
    let before = ids.len();
    ids.retain(|existing| existing != id);
    ids.len() != before
}
