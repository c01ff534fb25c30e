//! Heuristic pre-router
//!
//! Cheap text checks that run before any model call. Two routes exist: a
//! forced IT-contact path for access requests, and a contact-lookup seeding
//! path for "who supports X" questions. The forced path wins when both
//! trigger.

/// Phrases that force the IT-contact path, matched case-insensitively
const ACCESS_REQUEST_PHRASES: &[&str] = &[
    "request it access",
    "it access",
    "access request",
    "quyền truy cập it",
    "yêu cầu truy cập it",
];

/// Keywords that, together with "who", trigger contact-lookup seeding
const WHO_KEYWORDS: &[&str] = &["support", "owner", "phụ trách"];

/// Routing decision for one user message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreRoute {
    /// Synthesize `get_it_contact`, finalize in one model call
    ForceItContact,
    /// Extract the topic and seed a `lookup_contact` call into history
    SeedContactLookup,
    /// No heuristic applies
    None,
}

/// Classify a user message
pub fn classify(text: &str) -> PreRoute {
    let low = text.to_lowercase();

    if ACCESS_REQUEST_PHRASES.iter().any(|p| low.contains(p)) {
        return PreRoute::ForceItContact;
    }

    if low.contains("who") && WHO_KEYWORDS.iter().any(|k| low.contains(k)) {
        return PreRoute::SeedContactLookup;
    }

    PreRoute::None
}
