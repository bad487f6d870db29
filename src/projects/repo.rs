use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::projects::repo_types::{NewProject, Project};
use crate::slug::is_derived_from;

const COLUMNS: &str = "id, title, slug, description, content, technologies, image_urls, \
    thumbnail_url, github_url, live_url, featured, created_at, updated_at";

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects, newest first.
    async fn list(&self) -> StoreResult<Vec<Project>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>>;
    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Project>>;
    /// Slugs equal to `base` or `base-<n>`, ignoring the project `exclude`.
    async fn slugs_derived_from(&self, base: &str, exclude: Option<Uuid>)
        -> StoreResult<Vec<String>>;
    async fn insert(&self, project: &NewProject) -> StoreResult<Project>;
    /// Replaces every writable column; `None` when no such project.
    async fn update(&self, id: Uuid, project: &NewProject) -> StoreResult<Option<Project>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

pub struct PgProjectStore {
    db: PgPool,
}

impl PgProjectStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM projects WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM projects WHERE slug = $1"))
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
            SELECT slug FROM projects
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

    async fn insert(&self, p: &NewProject) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (title, slug, description, content, technologies, image_urls,
                                  thumbnail_url, github_url, live_url, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&p.title)
        .bind(&p.slug)
        .bind(&p.description)
        .bind(&p.content)
        .bind(&p.technologies)
        .bind(&p.image_urls)
        .bind(&p.thumbnail_url)
        .bind(&p.github_url)
        .bind(&p.live_url)
        .bind(p.featured)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, p: &NewProject) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
               SET title = $2, slug = $3, description = $4, content = $5, technologies = $6,
                   image_urls = $7, thumbnail_url = $8, github_url = $9, live_url = $10,
                   featured = $11, updated_at = now()
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&p.title)
        .bind(&p.slug)
        .bind(&p.description)
        .bind(&p.content)
        .bind(&p.technologies)
        .bind(&p.image_urls)
        .bind(&p.thumbnail_url)
        .bind(&p.github_url)
        .bind(&p.live_url)
        .bind(p.featured)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub use memory::MemoryProjectStore;
