//! Canonical (title, body) pairs for line items.
//!
//! Items arrive with a free-form optional title and description. The rules
//! below decide which text is the bold title and which is the wrapped body,
//! and they are the only place that decision is made.

use serde::Serialize;

/// Descriptions up to this many characters are promoted to the title slot
/// when the item has no title.
pub const SHORT_DESCRIPTION_CHARS: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedItem {
    pub title: Option<String>,
    pub body: Option<String>,
}

fn present(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Derive the (title, body) pair for an item.
///
/// 1. Both inputs are trimmed; empty means absent.
/// 2. With a title, the description becomes the body unless it repeats the
///    title (ignoring case).
/// 3. Without a title, a short description is promoted to the title.
/// 4. Otherwise the description is the body.
pub fn normalize_item(title: Option<&str>, description: Option<&str>) -> NormalizedItem {
    let title = present(title);
    let description = present(description);

    match (title, description) {
        (Some(t), Some(d)) if t.to_lowercase() != d.to_lowercase() => NormalizedItem {
            title: Some(t.to_string()),
            body: Some(d.to_string()),
        },
        (Some(t), _) => NormalizedItem {
            title: Some(t.to_string()),
            body: None,
        },
        (None, Some(d)) if d.chars().count() <= SHORT_DESCRIPTION_CHARS => NormalizedItem {
            title: Some(d.to_string()),
            body: None,
        },
        (None, d) => NormalizedItem {
            title: None,
            body: d.map(str::to_string),
        },
    }
}
