//! Identifier helpers shared by every stage of the migration.
//!
//! Author and learning-path documents are named by the slug of their name or title, and courses
//! reference them by that same slug, so all of them must go through [`slugify`].

use uuid::Uuid;

/// Produce a URL-safe slug from arbitrary text.
///
/// The text is lower-cased, whitespace runs become a single `-`, anything outside of
/// `[A-Za-z0-9_-]` is dropped, repeated `-` are collapsed and leading or trailing `-` are trimmed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for ch in text.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }

        in_whitespace = false;

        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            slug.push(ch);
        }
    }

    let mut collapsed = String::with_capacity(slug.len());
    for ch in slug.chars() {
        if ch == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(ch);
    }

    collapsed.trim_matches('-').to_string()
}

/// Upper-case the first character of every space separated word.
pub fn capitalize(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A fresh random identifier for a newly created document.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
