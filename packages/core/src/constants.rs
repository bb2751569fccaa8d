use std::env;
use std::path::PathBuf;

/// Assumed reading speed used to estimate reading time
pub const WORDS_PER_MINUTE: usize = 200;

/// Root directory (relative to the asset store) for post images
pub const IMAGE_UPLOAD_ROOT: &str = "post_images";

pub const TAG_NAME_MAX_LEN: usize = 100;
pub const TAG_SLUG_MAX_LEN: usize = 100;
pub const POST_TITLE_MAX_LEN: usize = 200;
pub const POST_SLUG_MAX_LEN: usize = 200;
pub const POST_EXCERPT_MAX_LEN: usize = 300;
pub const YOUTUBE_URL_MAX_LEN: usize = 200;

/// Get the path to the Quill directory (~/.quill)
pub fn quill_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home).join(".quill");
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".quill")
}

/// Get the path to the default database file (~/.quill/quill.db)
pub fn database_file() -> PathBuf {
    quill_dir().join("quill.db")
}
