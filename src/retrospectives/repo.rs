use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::retrospectives::repo_types::{NewRetrospectivePost, RetrospectivePost};

const COLUMNS: &str = "id, title, content, tags, thumbnail, created_at, updated_at";

#[async_trait]
pub trait RetrospectiveStore: Send + Sync {
    /// Newest first.
    async fn list(&self) -> StoreResult<Vec<RetrospectivePost>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<RetrospectivePost>>;
    async fn insert(&self, post: &NewRetrospectivePost) -> StoreResult<RetrospectivePost>;
    async fn update(
        &self,
        id: Uuid,
        post: &NewRetrospectivePost,
    ) -> StoreResult<Option<RetrospectivePost>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

pub struct PgRetrospectiveStore {
    db: PgPool,
}

impl PgRetrospectiveStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RetrospectiveStore for PgRetrospectiveStore {
    async fn list(&self) -> StoreResult<Vec<RetrospectivePost>> {
        let rows = sqlx::query_as::<_, RetrospectivePost>(&format!(
            "SELECT {COLUMNS} FROM retrospective_posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<RetrospectivePost>> {
        let row = sqlx::query_as::<_, RetrospectivePost>(&format!(
            "SELECT {COLUMNS} FROM retrospective_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, p: &NewRetrospectivePost) -> StoreResult<RetrospectivePost> {
        let row = sqlx::query_as::<_, RetrospectivePost>(&format!(
            r#"
            INSERT INTO retrospective_posts (title, content, tags, thumbnail)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&p.title)
        .bind(&p.content)
        .bind(&p.tags)
        .bind(&p.thumbnail)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        p: &NewRetrospectivePost,
    ) -> StoreResult<Option<RetrospectivePost>> {
        let row = sqlx::query_as::<_, RetrospectivePost>(&format!(
            r#"
            UPDATE retrospective_posts
               SET title = $2, content = $3, tags = $4, thumbnail = $5, updated_at = now()
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&p.title)
        .bind(&p.content)
        .bind(&p.tags)
        .bind(&p.thumbnail)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM retrospective_posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub use memory::MemoryRetrospectiveStore;
