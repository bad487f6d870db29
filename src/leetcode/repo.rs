use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::leetcode::repo_types::{LeetcodeSolution, NewLeetcodeSolution};

const COLUMNS: &str = "id, title, number, difficulty, category, description, approach, solution, \
    python_solution, java_solution, cpp_solution, javascript_solution, time_complexity, \
    space_complexity, time_complexity_explanation, space_complexity_explanation, tags, \
    leetcode_url, created_at, updated_at";

#[async_trait]
pub trait LeetcodeStore: Send + Sync {
    /// Newest first.
    async fn list(&self) -> StoreResult<Vec<LeetcodeSolution>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<LeetcodeSolution>>;
    async fn insert(&self, s: &NewLeetcodeSolution) -> StoreResult<LeetcodeSolution>;
    async fn update(&self, id: Uuid, s: &NewLeetcodeSolution)
        -> StoreResult<Option<LeetcodeSolution>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

pub struct PgLeetcodeStore {
    db: PgPool,
}

impl PgLeetcodeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LeetcodeStore for PgLeetcodeStore {
    async fn list(&self) -> StoreResult<Vec<LeetcodeSolution>> {
        let rows = sqlx::query_as::<_, LeetcodeSolution>(&format!(
            "SELECT {COLUMNS} FROM leetcode_solutions ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<LeetcodeSolution>> {
        let row = sqlx::query_as::<_, LeetcodeSolution>(&format!(
            "SELECT {COLUMNS} FROM leetcode_solutions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, s: &NewLeetcodeSolution) -> StoreResult<LeetcodeSolution> {
        let row = sqlx::query_as::<_, LeetcodeSolution>(&format!(
            r#"
            INSERT INTO leetcode_solutions (
                title, number, difficulty, category, description, approach, solution,
                python_solution, java_solution, cpp_solution, javascript_solution,
                time_complexity, space_complexity, time_complexity_explanation,
                space_complexity_explanation, tags, leetcode_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&s.title)
        .bind(s.number)
        .bind(s.difficulty)
        .bind(&s.category)
        .bind(&s.description)
        .bind(&s.approach)
        .bind(&s.solution)
        .bind(&s.python_solution)
        .bind(&s.java_solution)
        .bind(&s.cpp_solution)
        .bind(&s.javascript_solution)
        .bind(&s.time_complexity)
        .bind(&s.space_complexity)
        .bind(&s.time_complexity_explanation)
        .bind(&s.space_complexity_explanation)
        .bind(&s.tags)
        .bind(&s.leetcode_url)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        s: &NewLeetcodeSolution,
    ) -> StoreResult<Option<LeetcodeSolution>> {
        let row = sqlx::query_as::<_, LeetcodeSolution>(&format!(
            r#"
            UPDATE leetcode_solutions
               SET title = $2, number = $3, difficulty = $4, category = $5, description = $6,
                   approach = $7, solution = $8, python_solution = $9, java_solution = $10,
                   cpp_solution = $11, javascript_solution = $12, time_complexity = $13,
                   space_complexity = $14, time_complexity_explanation = $15,
                   space_complexity_explanation = $16, tags = $17, leetcode_url = $18,
                   updated_at = now()
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&s.title)
        .bind(s.number)
        .bind(s.difficulty)
        .bind(&s.category)
        .bind(&s.description)
        .bind(&s.approach)
        .bind(&s.solution)
        .bind(&s.python_solution)
        .bind(&s.java_solution)
        .bind(&s.cpp_solution)
        .bind(&s.javascript_solution)
        .bind(&s.time_complexity)
        .bind(&s.space_complexity)
        .bind(&s.time_complexity_explanation)
        .bind(&s.space_complexity_explanation)
        .bind(&s.tags)
        .bind(&s.leetcode_url)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM leetcode_solutions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub use memory::MemoryLeetcodeStore;
