// ABOUTME: Upload path construction for post images
// ABOUTME: Date-partitioned relative paths and filename sanitising

use chrono::{DateTime, Utc};

use crate::constants::IMAGE_UPLOAD_ROOT;
use crate::validation::ValidationError;

/// Reduce an uploaded filename to a safe final path component.
///
/// Directory parts are dropped, whitespace becomes `_`, and anything other than
/// ASCII alphanumerics, `-`, `_` and `.` is removed.
pub fn sanitize_filename(filename: &str) -> Result<String, ValidationError> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') => Some(c),
            _ => None,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(ValidationError::InvalidFilename(filename.to_string()));
    }

    Ok(cleaned)
}

/// Storage path for an image uploaded at `uploaded_at`:
/// `post_images/<YYYY>/<MM>/<DD>/<filename>`
pub fn image_upload_path(
    filename: &str,
    uploaded_at: DateTime<Utc>,
) -> Result<String, ValidationError> {
    let filename = sanitize_filename(filename)?;
    Ok(format!(
        "{}/{}/{}",
        IMAGE_UPLOAD_ROOT,
        uploaded_at.format("%Y/%m/%d"),
        filename
    ))
}
