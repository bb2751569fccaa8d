// ABOUTME: Tag registry for categorising posts
// ABOUTME: Provides types and storage layer for slugged tags

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::TagStorage;
pub use types::{Tag, TagCreateInput, TagUpdateInput};
