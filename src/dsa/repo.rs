use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::db::StoreResult;
use crate::dsa::repo_types::{DsaPost, NewDsaPost};
use crate::slug::is_derived_from;

const COLUMNS: &str = "id, title, slug, description, content, category, tags, read_time, \
    practice_questions, created_at, updated_at";

#[async_trait]
pub trait DsaStore: Send + Sync {
    /// Newest first.
    async fn list(&self) -> StoreResult<Vec<DsaPost>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<DsaPost>>;
    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<DsaPost>>;
    /// Slugs equal to `base` or `base-<n>`, ignoring the post `exclude`.
    async fn slugs_derived_from(&self, base: &str, exclude: Option<Uuid>)
        -> StoreResult<Vec<String>>;
    async fn insert(&self, post: &NewDsaPost) -> StoreResult<DsaPost>;
    async fn update(&self, id: Uuid, post: &NewDsaPost) -> StoreResult<Option<DsaPost>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

pub struct PgDsaStore {
    db: PgPool,
}

impl PgDsaStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DsaStore for PgDsaStore {
    async fn list(&self) -> StoreResult<Vec<DsaPost>> {
        let rows = sqlx::query_as::<_, DsaPost>(&format!(
            "SELECT {COLUMNS} FROM dsa_posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<DsaPost>> {
        let row = sqlx::query_as::<_, DsaPost>(&format!("SELECT {COLUMNS} FROM dsa_posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<DsaPost>> {
        let row = sqlx::query_as::<_, DsaPost>(&format!("SELECT {COLUMNS} FROM dsa_posts WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn slugs_derived_from(
        &self,
        base: &str,
        exclude: Option<Uuid>,
    ) -> StoreResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT slug FROM dsa_posts
             WHERE (slug = $1 OR slug LIKE $1 || '-%')
               AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(base)
        .bind(exclude)
        .fetch_all(&self.db)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(s,)| s)
            .filter(|s| is_derived_from(s, base))
            .collect())
    }

    async fn insert(&self, p: &NewDsaPost) -> StoreResult<DsaPost> {
        let row = sqlx::query_as::<_, DsaPost>(&format!(
            r#"
            INSERT INTO dsa_posts (title, slug, description, content, category, tags, read_time,
                                   practice_questions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&p.title)
        .bind(&p.slug)
        .bind(&p.description)
        .bind(&p.content)
        .bind(&p.category)
        .bind(&p.tags)
        .bind(p.read_time)
        .bind(Json(&p.practice_questions))
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, p: &NewDsaPost) -> StoreResult<Option<DsaPost>> {
        let row = sqlx::query_as::<_, DsaPost>(&format!(
            r#"
            UPDATE dsa_posts
               SET title = $2, slug = $3, description = $4, content = $5, category = $6,
                   tags = $7, read_time = $8, practice_questions = $9, updated_at = now()
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&p.title)
        .bind(&p.slug)
        .bind(&p.description)
        .bind(&p.content)
        .bind(&p.category)
        .bind(&p.tags)
        .bind(p.read_time)
        .bind(Json(&p.practice_questions))
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM dsa_posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub use memory::MemoryDsaStore;
