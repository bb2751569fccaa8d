// ABOUTME: Integration tests for post storage and the published read views
// ABOUTME: Covers derived fields, slug rules, related posts, listing, detail, images, and deletion policies

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use quill_posts::{
    PostCreateInput, PostFilter, PostStatus, PostStorage, PostUpdateInput, RELATED_POSTS_LIMIT,
};
use quill_storage::test_utils::memory_pool;
use quill_storage::{AuthorCreateInput, AuthorStorage, StorageError, ValidationError};
use quill_tags::{Tag, TagCreateInput, TagStorage};
use sqlx::SqlitePool;

struct Fixture {
    pool: SqlitePool,
    posts: PostStorage,
    tags: TagStorage,
}

async fn setup() -> Fixture {
    let pool = memory_pool().await;
    Fixture {
        posts: PostStorage::new(pool.clone()),
        tags: TagStorage::new(pool.clone()),
        pool,
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

fn draft(title: &str) -> PostCreateInput {
    PostCreateInput {
        title: title.to_string(),
        content: "Some body text".to_string(),
        ..Default::default()
    }
}

/// Published post `days` days after the base time, carrying `tags`
fn published(title: &str, days: i64, tags: &[&Tag]) -> PostCreateInput {
    PostCreateInput {
        title: title.to_string(),
        status: PostStatus::Published,
        pub_date: Some(base_time() + Duration::days(days)),
        tag_ids: tags.iter().map(|t| t.id.clone()).collect(),
        ..Default::default()
    }
}

async fn tag(fx: &Fixture, name: &str) -> Tag {
    fx.tags
        .create_tag(
            TagCreateInput {
                name: name.to_string(),
                slug: None,
            },
            base_time(),
        )
        .await
        .unwrap()
}

fn titles(posts: &[quill_posts::Post]) -> Vec<&str> {
    posts.iter().map(|p| p.title.as_str()).collect()
}

#[tokio::test]
async fn test_create_post_derives_fields() {
    let fx = setup().await;
    let now = base_time();

    let post = fx
        .posts
        .create_post(
            PostCreateInput {
                title: "Hello, Wörld!".to_string(),
                content: words(400),
                ..Default::default()
            },
            now,
        )
        .await
        .unwrap();

    assert!(post.id.starts_with("post-"));
    assert_eq!(post.slug, "hello-world");
    assert_eq!(post.reading_time, 2);
    assert_eq!(post.status, PostStatus::Draft);
    assert!(!post.is_published());
    assert!(!post.is_featured);
    assert_eq!(post.pub_date, now);
    assert_eq!(post.created_at, now);
    assert_eq!(post.updated_at, now);
    assert_eq!(post.absolute_url(), "/posts/hello-world/");
    assert_eq!(post.to_string(), "Hello, Wörld!");
}

#[tokio::test]
async fn test_reading_time_floor() {
    let fx = setup().await;

    let post = fx
        .posts
        .create_post(
            PostCreateInput {
                title: "Empty".to_string(),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();

    assert_eq!(post.content, "");
    assert_eq!(post.reading_time, 1);
}

#[tokio::test]
async fn test_reading_time_recomputed_on_every_save() {
    let fx = setup().await;
    let post = fx.posts.create_post(draft("Growing"), base_time()).await.unwrap();
    assert_eq!(post.reading_time, 1);

    let later = base_time() + Duration::hours(1);
    let post = fx
        .posts
        .update_post(
            &post.id,
            PostUpdateInput {
                content: Some(words(1000)),
                ..Default::default()
            },
            later,
        )
        .await
        .unwrap();
    assert_eq!(post.reading_time, 5);
    assert_eq!(post.updated_at, later);

    // Saving again without touching content is idempotent
    let again = fx
        .posts
        .update_post(
            &post.id,
            PostUpdateInput {
                lead: Some("A new lead".to_string()),
                ..Default::default()
            },
            later + Duration::hours(1),
        )
        .await
        .unwrap();
    assert_eq!(again.reading_time, post.reading_time);
    assert_eq!(again.lead, "A new lead");
}

#[tokio::test]
async fn test_reading_time_ignores_stale_stored_value() {
    let fx = setup().await;
    let post = fx
        .posts
        .create_post(
            PostCreateInput {
                title: "Tampered".to_string(),
                content: words(400),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();

    sqlx::query("UPDATE posts SET reading_time = 42 WHERE id = ?")
        .bind(&post.id)
        .execute(&fx.pool)
        .await
        .unwrap();

    let saved = fx
        .posts
        .update_post(&post.id, PostUpdateInput::default(), base_time())
        .await
        .unwrap();
    assert_eq!(saved.reading_time, 2);
}

#[tokio::test]
async fn test_slug_is_permanent() {
    let fx = setup().await;
    let post = fx.posts.create_post(draft("Original Title"), base_time()).await.unwrap();

    let renamed = fx
        .posts
        .update_post(
            &post.id,
            PostUpdateInput {
                title: Some("A Completely Different Title".to_string()),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();

    assert_eq!(renamed.title, "A Completely Different Title");
    assert_eq!(renamed.slug, "original-title");

    // Blanking the slug re-derives it at that save
    let rederived = fx
        .posts
        .update_post(
            &post.id,
            PostUpdateInput {
                slug: Some(String::new()),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();
    assert_eq!(rederived.slug, "a-completely-different-title");
}

#[tokio::test]
async fn test_duplicate_slug_fails_without_suffixing() {
    let fx = setup().await;
    fx.posts.create_post(draft("Same Title"), base_time()).await.unwrap();

    let err = fx
        .posts
        .create_post(draft("Same Title"), base_time())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::DuplicateSlug(ref s) if s == "same-title"));

    let all = fx.posts.list_posts(&PostFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_create_post_validation() {
    let fx = setup().await;

    let err = fx
        .posts
        .create_post(
            PostCreateInput {
                title: "Too long excerpt".to_string(),
                excerpt: "e".repeat(301),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::TooLong { field: "excerpt", .. })
    ));

    let err = fx
        .posts
        .create_post(draft(&"t".repeat(201)), base_time())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::TooLong { field: "title", .. })
    ));

    let err = fx.posts.create_post(draft("   "), base_time()).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(ValidationError::Empty { .. })));

    let err = fx
        .posts
        .create_post(
            PostCreateInput {
                title: "Ghost tag".to_string(),
                tag_ids: vec!["tag-missing".to_string()],
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::UnknownReference { field: "tag", .. })
    ));

    // Nothing was half-written
    assert!(fx.posts.list_posts(&PostFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tags_sorted_by_name_and_replaced_on_update() {
    let fx = setup().await;
    let rust = tag(&fx, "Rust").await;
    let go = tag(&fx, "Go").await;
    let zig = tag(&fx, "Zig").await;

    let post = fx
        .posts
        .create_post(
            PostCreateInput {
                title: "Languages".to_string(),
                tag_ids: vec![rust.id.clone(), go.id.clone(), rust.id.clone()],
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();

    assert_eq!(post.tags, vec![go.clone(), rust.clone()]);
    assert_eq!(post.tag_list(), "Go, Rust");

    let post = fx
        .posts
        .update_post(
            &post.id,
            PostUpdateInput {
                tag_ids: Some(vec![zig.id.clone()]),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();
    assert_eq!(post.tags, vec![zig]);
}

#[tokio::test]
async fn test_youtube_embed_from_post() {
    let fx = setup().await;

    let short = fx
        .posts
        .create_post(
            PostCreateInput {
                title: "Short link".to_string(),
                youtube_url: Some("https://youtu.be/abc123?t=5".to_string()),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();
    assert_eq!(short.youtube_video_id(), Some("abc123"));
    assert!(short.youtube_embed().contains("https://www.youtube.com/embed/abc123"));

    let watch = fx
        .posts
        .create_post(
            PostCreateInput {
                title: "Watch link".to_string(),
                youtube_url: Some("https://example.com/watch?v=xyz&list=2".to_string()),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();
    assert_eq!(watch.youtube_video_id(), Some("xyz"));

    let cleared = fx
        .posts
        .update_post(
            &watch.id,
            PostUpdateInput {
                youtube_url: Some(String::new()),
                ..Default::default()
            },
            base_time(),
        )
        .await
        .unwrap();
    assert_eq!(cleared.youtube_url, None);
    assert_eq!(cleared.youtube_embed(), "");
}

#[tokio::test]
async fn test_listing_empty() {
    let fx = setup().await;
    fx.posts.create_post(draft("Only a draft"), base_time()).await.unwrap();

    let listing = fx.posts.listing().await.unwrap();
    assert!(listing.latest.is_none());
    assert!(listing.posts.is_empty());
}

#[tokio::test]
async fn test_listing_latest_then_rest() {
    let fx = setup().await;
    fx.posts.create_post(published("Old", 1, &[]), base_time()).await.unwrap();
    fx.posts.create_post(published("Newest", 3, &[]), base_time()).await.unwrap();
    fx.posts.create_post(published("Middle", 2, &[]), base_time()).await.unwrap();
    fx.posts.create_post(draft("Hidden"), base_time()).await.unwrap();

    let listing = fx.posts.listing().await.unwrap();
    let latest = listing.latest.unwrap();
    assert_eq!(latest.title, "Newest");
    assert!(latest.is_published());
    assert!(listing.posts.iter().all(|p| p.is_published()));
    assert_eq!(titles(&listing.posts), vec!["Middle", "Old"]);
}

#[tokio::test]
async fn test_detail_of_draft_is_not_found() {
    let fx = setup().await;
    let post = fx.posts.create_post(draft("Secret Plans"), base_time()).await.unwrap();

    // The row exists...
    assert!(fx.posts.get_post_by_slug(&post.slug).await.unwrap().is_some());

    // ...but is not resolvable publicly
    let err = fx.posts.published_detail("secret-plans").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));

    let err = fx.posts.published_detail("no-such-post").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn test_related_posts() {
    let fx = setup().await;
    let a = tag(&fx, "A").await;
    let b = tag(&fx, "B").await;
    let c = tag(&fx, "C").await;

    let subject = fx
        .posts
        .create_post(published("Subject", 10, &[&a, &b]), base_time())
        .await
        .unwrap();

    // Shares both tags: must appear once
    fx.posts.create_post(published("Both", 1, &[&a, &b]), base_time()).await.unwrap();
    fx.posts.create_post(published("Only A", 5, &[&a]), base_time()).await.unwrap();
    fx.posts.create_post(published("Only B", 3, &[&b]), base_time()).await.unwrap();
    fx.posts.create_post(published("Unrelated", 20, &[&c]), base_time()).await.unwrap();
    fx.posts.create_post(published("Untagged", 21, &[]), base_time()).await.unwrap();
    fx.posts
        .create_post(
            PostCreateInput {
                status: PostStatus::Draft,
                ..published("Draft A", 30, &[&a])
            },
            base_time(),
        )
        .await
        .unwrap();

    let detail = fx.posts.published_detail(&subject.slug).await.unwrap();
    assert_eq!(detail.post.id, subject.id);
    assert_eq!(titles(&detail.related), vec!["Only A", "Only B", "Both"]);
}

#[tokio::test]
async fn test_related_posts_truncated() {
    let fx = setup().await;
    let a = tag(&fx, "A").await;

    let subject = fx
        .posts
        .create_post(published("Subject", 0, &[&a]), base_time())
        .await
        .unwrap();
    for day in 1..=6 {
        fx.posts
            .create_post(published(&format!("Peer {day}"), day, &[&a]), base_time())
            .await
            .unwrap();
    }

    let related = fx.posts.related_posts(&subject).await.unwrap();
    assert_eq!(related.len() as i64, RELATED_POSTS_LIMIT);
    assert_eq!(titles(&related), vec!["Peer 6", "Peer 5", "Peer 4", "Peer 3"]);
    assert!(related.iter().all(|p| p.id != subject.id));
}

#[tokio::test]
async fn test_related_posts_of_untagged_post_is_empty() {
    let fx = setup().await;
    let a = tag(&fx, "A").await;

    let subject = fx
        .posts
        .create_post(published("Loner", 0, &[]), base_time())
        .await
        .unwrap();
    fx.posts.create_post(published("Tagged", 1, &[&a]), base_time()).await.unwrap();

    assert!(fx.posts.related_posts(&subject).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_related_posts_for_draft_subject_excludes_itself() {
    let fx = setup().await;
    let a = tag(&fx, "A").await;

    let subject = fx
        .posts
        .create_post(
            PostCreateInput {
                status: PostStatus::Draft,
                ..published("Draft subject", 0, &[&a])
            },
            base_time(),
        )
        .await
        .unwrap();
    fx.posts.create_post(published("Peer", 1, &[&a]), base_time()).await.unwrap();

    let related = fx.posts.related_posts(&subject).await.unwrap();
    assert_eq!(titles(&related), vec!["Peer"]);
}

#[tokio::test]
async fn test_list_filters_and_posts_by_tag() {
    let fx = setup().await;
    let authors = AuthorStorage::new(fx.pool.clone());
    let ada = authors
        .create_author(
            AuthorCreateInput {
                username: "ada".to_string(),
                display_name: None,
            },
            base_time(),
        )
        .await
        .unwrap();
    let rust = tag(&fx, "Rust").await;
    tag(&fx, "Empty").await;

    fx.posts
        .create_post(
            PostCreateInput {
                author_id: Some(ada.id.clone()),
                ..published("By Ada", 2, &[&rust])
            },
            base_time(),
        )
        .await
        .unwrap();
    fx.posts.create_post(published("Anonymous", 1, &[&rust]), base_time()).await.unwrap();
    fx.posts
        .create_post(
            PostCreateInput {
                status: PostStatus::Draft,
                ..published("Draft Rust", 3, &[&rust])
            },
            base_time(),
        )
        .await
        .unwrap();

    let by_ada = fx
        .posts
        .list_posts(&PostFilter {
            author_id: Some(ada.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&by_ada), vec!["By Ada"]);

    let drafts = fx
        .posts
        .list_posts(&PostFilter {
            status: Some(PostStatus::Draft),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&drafts), vec!["Draft Rust"]);

    let all_rust = fx
        .posts
        .list_posts(&PostFilter {
            tag: Some("rust".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&all_rust), vec!["Draft Rust", "By Ada", "Anonymous"]);

    let public_rust = fx.posts.published_by_tag("rust").await.unwrap();
    assert_eq!(titles(&public_rust), vec!["By Ada", "Anonymous"]);

    assert!(fx.posts.published_by_tag("empty").await.unwrap().is_empty());
    assert!(matches!(
        fx.posts.published_by_tag("nope").await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn test_list_filters_by_publish_date() {
    let fx = setup().await;
    fx.posts.create_post(published("Day 1", 1, &[]), base_time()).await.unwrap();
    fx.posts.create_post(published("Day 2", 2, &[]), base_time()).await.unwrap();
    fx.posts.create_post(published("Day 3", 3, &[]), base_time()).await.unwrap();

    // Lower bound inclusive, upper bound exclusive
    let window = fx
        .posts
        .list_posts(&PostFilter {
            published_after: Some(base_time() + Duration::days(2)),
            published_before: Some(base_time() + Duration::days(3)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&window), vec!["Day 2"]);

    let since = fx
        .posts
        .list_posts(&PostFilter {
            published_after: Some(base_time() + Duration::days(2)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&since), vec!["Day 3", "Day 2"]);

    let until = fx
        .posts
        .list_posts(&PostFilter {
            status: Some(PostStatus::Published),
            published_before: Some(base_time() + Duration::days(2)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&until), vec!["Day 1"]);
}

#[tokio::test]
async fn test_images() {
    let fx = setup().await;
    let post = fx.posts.create_post(draft("Gallery"), base_time()).await.unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();

    let first = fx.posts.add_image(&post.id, "cover photo.jpg", at).await.unwrap();
    let second = fx
        .posts
        .add_image(&post.id, "../inline.png", at + Duration::minutes(1))
        .await
        .unwrap();

    assert_eq!(first.image_path, "post_images/2024/03/07/cover_photo.jpg");
    assert_eq!(second.image_path, "post_images/2024/03/07/inline.png");
    assert_eq!(first.label(&post.title), "Image in Gallery");

    let post = fx.posts.get_post(&post.id).await.unwrap();
    assert_eq!(post.images, vec![first.clone(), second.clone()]);

    fx.posts.delete_image(&first.id).await.unwrap();
    assert_eq!(fx.posts.list_images(&post.id).await.unwrap(), vec![second]);

    assert!(matches!(
        fx.posts.add_image("post-missing", "x.jpg", at).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_post_cascades() {
    let fx = setup().await;
    let rust = tag(&fx, "Rust").await;
    let post = fx
        .posts
        .create_post(published("Doomed", 1, &[&rust]), base_time())
        .await
        .unwrap();
    fx.posts.add_image(&post.id, "a.jpg", base_time()).await.unwrap();

    fx.posts.delete_post(&post.id).await.unwrap();

    let images: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_images")
        .fetch_one(&fx.pool)
        .await
        .unwrap();
    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_tags")
        .fetch_one(&fx.pool)
        .await
        .unwrap();
    assert_eq!(images, 0);
    assert_eq!(links, 0);

    // The tag itself survives
    assert_eq!(fx.tags.get_tag(&rust.id).await.unwrap(), rust);
    assert!(matches!(
        fx.posts.delete_post(&post.id).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_tag_detaches_from_posts() {
    let fx = setup().await;
    let rust = tag(&fx, "Rust").await;
    let go = tag(&fx, "Go").await;
    let post = fx
        .posts
        .create_post(published("Both", 1, &[&rust, &go]), base_time())
        .await
        .unwrap();

    fx.tags.delete_tag(&rust.id).await.unwrap();

    let post = fx.posts.get_post(&post.id).await.unwrap();
    assert_eq!(post.tags, vec![go]);
}

#[tokio::test]
async fn test_deleting_author_unattributes_posts() {
    let fx = setup().await;
    let authors = AuthorStorage::new(fx.pool.clone());
    let ada = authors
        .create_author(
            AuthorCreateInput {
                username: "ada".to_string(),
                display_name: Some("Ada".to_string()),
            },
            base_time(),
        )
        .await
        .unwrap();

    let post = fx
        .posts
        .create_post(
            PostCreateInput {
                author_id: Some(ada.id.clone()),
                ..draft("Attributed")
            },
            base_time(),
        )
        .await
        .unwrap();
    assert_eq!(post.author_id.as_deref(), Some(ada.id.as_str()));

    authors.delete_author(&ada.id).await.unwrap();

    let post = fx.posts.get_post(&post.id).await.unwrap();
    assert_eq!(post.author_id, None);
}
