// ABOUTME: Tag type definitions
// ABOUTME: Named, slugged labels attached to posts

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Public URL of the tag's post listing
    pub fn absolute_url(&self) -> String {
        format!("/tags/{}/", self.slug)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagCreateInput {
    pub name: String,
    /// Derived from `name` when absent or empty
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagUpdateInput {
    pub name: Option<String>,
    /// `Some("")` re-derives the slug from the (possibly new) name
    pub slug: Option<String>,
}
