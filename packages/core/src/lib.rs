// ABOUTME: Core derivations and validation rules for Quill
// ABOUTME: Slugs, reading time, video embeds, and upload paths shared by all packages

pub mod constants;
pub mod reading_time;
pub mod slugs;
pub mod uploads;
pub mod utils;
pub mod validation;
pub mod youtube;

// Re-export constants
pub use constants::{database_file, quill_dir, WORDS_PER_MINUTE};

// Re-export derivations
pub use reading_time::{reading_time, word_count};
pub use slugs::{resolve_slug, slugify, validate_slug};
pub use uploads::{image_upload_path, sanitize_filename};
pub use youtube::{youtube_embed, youtube_video_id};

// Re-export utilities
pub use utils::generate_id;

// Re-export validation
pub use validation::{check_length, check_not_empty, ValidationError};
