use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Project record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String, // markdown
    pub technologies: Vec<String>,
    pub image_urls: Vec<String>,
    pub thumbnail_url: Option<String>, // one of image_urls
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Every writable column of a project, slug included.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub technologies: Vec<String>,
    pub image_urls: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
}
