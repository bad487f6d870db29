use serde::{Deserialize, Serialize};

use crate::forms::{lenient_i32, string_list};
use crate::leetcode::repo_types::Difficulty;

/// Body of `POST /api/leetcode` and `PUT /api/leetcode/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub number: Option<i32>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub approach: Option<String>,
    pub solution: Option<String>,
    pub python_solution: Option<String>,
    pub java_solution: Option<String>,
    pub cpp_solution: Option<String>,
    pub javascript_solution: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub time_complexity_explanation: Option<String>,
    pub space_complexity_explanation: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    pub leetcode_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeResponse {
    pub title: String,
    pub number: Option<i32>,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
