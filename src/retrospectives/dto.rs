use serde::Deserialize;

use crate::forms::{lenient_i32, present, string_list};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionItem {
    pub text: Option<String>,
    pub image_url: Option<String>,
}

/// Structured retrospective form; rendered into `content` when no
/// `content` is sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrospectiveSections {
    #[serde(default)]
    pub achievements: Vec<SectionItem>,
    #[serde(default)]
    pub challenges: Vec<SectionItem>,
    pub learnings: Option<String>,
    pub improvements: Option<String>,
    pub goals: Option<String>,
    pub reflection: Option<String>,
}

/// Body of `POST /api/retrospective` and `PUT /api/retrospective/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrospectiveRequest {
    pub title: Option<String>,
    /// 1-12 or a month name.
    pub month: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub year: Option<i32>,
    pub content: Option<String>,
    pub sections: Option<RetrospectiveSections>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    /// Absent: leave the stored thumbnail alone (updates).
    #[serde(default, deserialize_with = "present")]
    pub thumbnail: Option<Option<String>>,
}
