use serde_yaml::Value;

use crate::posts::Metadata;

/// The publish API accepts at most this many tags per post.
pub const MAX_TAGS: usize = 5;
/// Maximum tag length accepted by the publish API, in characters.
pub const MAX_TAG_LEN: usize = 25;

/// Derive publish tags from the `categories` and `tags` metadata fields.
///
/// Each field may hold a single string or a list of strings. Candidates are
/// cleaned in order of first occurrence; duplicates are not removed.
pub fn extract_tags(metadata: &Metadata) -> Vec<String> {
    let mut candidates = Vec::new();
    collect_strings(metadata.get("categories"), &mut candidates);
    collect_strings(metadata.get("tags"), &mut candidates);

    candidates
        .iter()
        .filter_map(|raw| clean_tag(raw))
        .take(MAX_TAGS)
        .collect()
}

fn collect_strings(value: Option<&Value>, out: &mut Vec<String>) {
    match value {
        Some(Value::String(single)) => out.push(single.clone()),
        Some(Value::Sequence(items)) => {
            for item in items {
                if let Value::String(text) = item {
                    out.push(text.clone());
                }
            }
        }
        _ => {}
    }
}

fn clean_tag(raw: &str) -> Option<String> {
    let cleaned = raw.trim().replace(['-', '_'], " ");
    if cleaned.is_empty() || cleaned.chars().count() > MAX_TAG_LEN {
        return None;
    }
    Some(cleaned)
}
