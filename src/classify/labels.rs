// src/classify/labels.rs
//! Candidate topics and sentinel values.

/// Topics offered to the zero-shot model, in the order they are sent.
pub const CANDIDATE_LABELS: [&str; 9] = [
    "Technology & Computing",
    "Business & Finance",
    "Politics & Government",
    "Sports & Athletics",
    "Entertainment & Celebrities",
    "Science & Research",
    "Health & Medicine",
    "Environment & Climate",
    "Education & Schools",
];

/// Returned for invalid input and, at the adapter boundary, for model failures.
pub const FALLBACK_TOPIC: &str = "General News";

/// Marks a headline whose classification failed inside a batch.
pub const ERROR_TOPIC: &str = "Classification Error";

/// True for any value a result's `topic` may legally hold.
pub fn is_known_topic(topic: &str) -> bool {
    topic == FALLBACK_TOPIC || topic == ERROR_TOPIC || CANDIDATE_LABELS.iter().any(|l| *l == topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_not_candidates() {
        assert!(!CANDIDATE_LABELS.contains(&FALLBACK_TOPIC));
        assert!(!CANDIDATE_LABELS.contains(&ERROR_TOPIC));
        assert!(is_known_topic(FALLBACK_TOPIC));
        assert!(is_known_topic("Health & Medicine"));
        assert!(!is_known_topic("Health"));
    }
}
