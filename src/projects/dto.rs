use serde::Deserialize;

use crate::forms::{present, string_list};

/// Body of `POST /api/projects` and `PUT /api/projects/{id}`.
/// Updates resend the whole record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub image_urls: Vec<String>,
    /// Absent: keep the stored thumbnail (updates). `null`: clear it.
    #[serde(default, deserialize_with = "present")]
    pub thumbnail_url: Option<Option<String>>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}
