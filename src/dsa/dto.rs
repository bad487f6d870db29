use serde::Deserialize;

use crate::forms::{lenient_i32, string_list};

/// Separately edited parts of a post; assembled into `content` when no
/// `content` is sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DsaSections {
    pub introduction: Option<String>,
    pub approach: Option<String>,
    pub complexity: Option<String>,
    pub examples: Option<String>,
    pub conclusion: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuestionInput {
    pub question: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub correct_answer_index: Option<i32>,
    pub explanation: Option<String>,
}

/// Body of `POST /api/dsa` and `PUT /api/dsa/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsaRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub sections: Option<DsaSections>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub read_time: Option<i32>,
    #[serde(default)]
    pub practice_questions: Option<Vec<PracticeQuestionInput>>,
}
