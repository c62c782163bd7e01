//! Pulls structured values out of free-text Insightly tag blobs.
//!
//! Every search is a case-insensitive substring test, not a word match: a
//! needle found inside a longer word still counts. Reports produced by
//! earlier versions of the tool depend on this, so keep it that way.

use crate::insightly::tags::model::{NOT_APPLICABLE, StatusTag, Vocabulary};

/// Status keywords in priority order. The first one contained in a blob wins.
pub const STATUS_PRIORITY: [(&str, StatusTag); 11] = [
    ("suspended", StatusTag::Suspended),
    ("withdrawn", StatusTag::Withdrawn),
    ("graduated", StatusTag::Graduated),
    ("expired", StatusTag::Expired),
    ("on hold", StatusTag::OnHold),
    ("cancelled", StatusTag::Cancelled),
    ("green", StatusTag::Green),
    ("orange", StatusTag::Orange),
    ("red", StatusTag::Red),
    ("black", StatusTag::Black),
    ("purple", StatusTag::Purple),
];

/// Keywords marking a contact as no longer active.
pub const INACTIVE_KEYWORDS: [&str; 4] = ["withdrawn", "expired", "graduated", "transferred"];

/// Returns the highest priority status found in the blob, or
/// [`StatusTag::NotApplicable`].
pub fn extract_status(tag_blob: &str) -> StatusTag {
    let haystack = tag_blob.to_lowercase();
    STATUS_PRIORITY
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, status)| *status)
        .unwrap_or(StatusTag::NotApplicable)
}

/// Returns the first vocabulary entry contained in the blob, with the
/// vocabulary's casing, or `N/A`.
pub fn extract_from_list(tag_blob: &str, vocabulary: &Vocabulary) -> String {
    let haystack = tag_blob.to_lowercase();
    vocabulary
        .entries()
        .iter()
        .find(|entry| haystack.contains(&entry.to_lowercase()))
        .cloned()
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// True when the blob mentions any of [`INACTIVE_KEYWORDS`].
pub fn is_inactive_tag(tag_blob: &str) -> bool {
    let haystack = tag_blob.to_lowercase();
    INACTIVE_KEYWORDS
        .iter()
        .any(|keyword| haystack.contains(keyword))
}
