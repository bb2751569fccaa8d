// ABOUTME: Slug derivation and validation
// ABOUTME: Turns titles and names into URL-safe identifiers

use crate::validation::{check_length, ValidationError};

/// Derive a slug from a title or name.
///
/// Lowercases, transliterates non-ASCII characters, collapses every run of
/// non-alphanumeric characters into a single `-`, and trims separators from
/// both ends. May return an empty string when nothing alphanumeric survives.
pub fn slugify(source: &str) -> String {
    slug::slugify(source)
}

/// Check an author-supplied slug against the shape [`slugify`] produces
pub fn validate_slug(slug: &str, max_len: usize) -> Result<(), ValidationError> {
    let is_valid = !slug.is_empty()
        && slug.len() <= max_len
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if is_valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidSlug(slug.to_string()))
    }
}

/// Slug to store for an entity at save time.
///
/// A non-empty `explicit` slug is validated and kept as given; otherwise the
/// slug is derived from `source`.
pub fn resolve_slug(
    explicit: Option<&str>,
    source: &str,
    max_len: usize,
) -> Result<String, ValidationError> {
    if let Some(slug) = explicit.filter(|s| !s.is_empty()) {
        validate_slug(slug, max_len)?;
        return Ok(slug.to_string());
    }

    let derived = slugify(source);
    if derived.is_empty() {
        return Err(ValidationError::EmptySlug(source.to_string()));
    }
    check_length("slug", &derived, max_len)?;
    Ok(derived)
}
