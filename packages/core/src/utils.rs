// ABOUTME: Shared utility functions for Quill
// ABOUTME: Prefixed identifier generation for stored records

/// Generate a record identifier such as `post-V1StGXR8_Z5jdHi6B-myT`
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid::nanoid!())
}
