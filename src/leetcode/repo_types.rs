use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "difficulty")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive match on the variant name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// LeetCode write-up record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeSolution {
    pub id: Uuid,
    pub title: String,
    pub number: i32,
    pub difficulty: Difficulty,
    pub category: String,
    pub description: String,
    pub approach: String,
    pub solution: String,
    pub python_solution: Option<String>,
    pub java_solution: Option<String>,
    pub cpp_solution: Option<String>,
    pub javascript_solution: Option<String>,
    pub time_complexity: String,
    pub space_complexity: String,
    pub time_complexity_explanation: Option<String>,
    pub space_complexity_explanation: Option<String>,
    pub tags: Vec<String>,
    pub leetcode_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLeetcodeSolution {
    pub title: String,
    pub number: i32,
    pub difficulty: Difficulty,
    pub category: String,
    pub description: String,
    pub approach: String,
    pub solution: String,
    pub python_solution: Option<String>,
    pub java_solution: Option<String>,
    pub cpp_solution: Option<String>,
    pub javascript_solution: Option<String>,
    pub time_complexity: String,
    pub space_complexity: String,
    pub time_complexity_explanation: Option<String>,
    pub space_complexity_explanation: Option<String>,
    pub tags: Vec<String>,
    pub leetcode_url: Option<String>,
}
