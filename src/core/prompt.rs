use crate::models::{MatchRequest, MatrimonialProfile};

/// Criteria used when the caller leaves matching criteria blank
pub const DEFAULT_MATCHING_CRITERIA: &str =
    "Compatible values, education and family background, similar lifestyle, and a location within reach.";

/// Render a match request into the model prompt.
///
/// Both fields are embedded verbatim. The model is asked for one suggestion
/// per line in the `Name (Score/100) rationale` shape the parser expects.
pub fn render_prompt(request: &MatchRequest) -> String {
    format!(
        "You are an AI matchmaker for a matrimonial service. \
Based on the following profile details and matching criteria, suggest potential matches \
and give each a compatibility score out of 100.\n\
\n\
Profile Details: {}\n\
Matching Criteria: {}\n\
\n\
Return the suggestions in the \"suggestedMatches\" field as plain text, one match per line, \
each line formatted exactly as: Name (Score/100) short explanation of the compatibility.\n\
Do not number the lines or add any other text.",
        request.profile_details, request.matching_criteria
    )
}

/// Describe a stored profile as free text for the suggestion backend
pub fn describe_profile(profile: &MatrimonialProfile) -> String {
    let mut parts = vec![format!("{}, {} years old, {}", profile.name, profile.age, profile.gender)];

    let fields = [
        ("Religion", &profile.religion),
        ("Community", &profile.community),
        ("Mother tongue", &profile.mother_tongue),
        ("City", &profile.city),
        ("Education", &profile.education),
        ("Profession", &profile.profession),
        ("About", &profile.about),
    ];

    for (label, value) in fields {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            parts.push(format!("{}: {}", label, value));
        }
    }

    if let Some(height) = profile.height_cm {
        parts.push(format!("Height: {} cm", height));
    }

    parts.join(". ")
}

/// Build a match request from a stored profile; criteria may come back blank
pub fn request_for_profile(profile: &MatrimonialProfile) -> MatchRequest {
    MatchRequest::new(
        describe_profile(profile),
        profile.partner_preferences.clone().unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> MatrimonialProfile {
        serde_json::from_value(serde_json::json!({
            "userId": "u1",
            "name": "Meera Iyer",
            "email": "meera@example.com",
            "gender": "female",
            "age": 29,
            "city": "Chennai",
            "profession": "  ",
            "heightCm": 162,
            "partnerPreferences": "Vegetarian, based in South India"
        }))
        .unwrap()
    }

    #[test]
    fn test_prompt_embeds_fields_verbatim() {
        let req = MatchRequest::new("Software engineer, loves trekking", "Someone adventurous");
        let prompt = render_prompt(&req);

        assert!(prompt.contains("Profile Details: Software engineer, loves trekking"));
        assert!(prompt.contains("Matching Criteria: Someone adventurous"));
        assert!(prompt.contains("Name (Score/100)"));
    }

    #[test]
    fn test_describe_profile_skips_blank_fields() {
        let text = describe_profile(&profile());

        assert!(text.starts_with("Meera Iyer, 29 years old, female"));
        assert!(text.contains("City: Chennai"));
        assert!(text.contains("Height: 162 cm"));
        assert!(!text.contains("Profession"));
    }

    #[test]
    fn test_request_for_profile_uses_partner_preferences() {
        let req = request_for_profile(&profile());
        assert_eq!(req.matching_criteria, "Vegetarian, based in South India");

        let mut p = profile();
        p.partner_preferences = None;
        assert_eq!(request_for_profile(&p).matching_criteria, "");
    }
}
