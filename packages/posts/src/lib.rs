// ABOUTME: Post store for Quill
// ABOUTME: Posts with derived slug and reading time, tag relations, images, and published read views

pub mod images;
pub mod storage;
pub mod types;

pub use storage::{PostStorage, RELATED_POSTS_LIMIT};
pub use types::{
    Post, PostCreateInput, PostDetail, PostFilter, PostImage, PostListing, PostStatus,
    PostUpdateInput,
};
