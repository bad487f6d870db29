//! Creates the admin account, or resets its password and name.
//!
//! Reads `DATABASE_URL`, `ADMIN_EMAIL`, `ADMIN_PASSWORD` and `ADMIN_NAME`.

use anyhow::Context;
use portfolio::auth::{
    repo::{PgUserStore, UserStore},
    repo_types::Role,
    services::{hash_password, is_valid_email},
};
use sqlx::postgres::PgPoolOptions;

const MIN_PASSWORD_LEN: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "portfolio=info,seed_admin=info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let email = std::env::var("ADMIN_EMAIL")
        .context("ADMIN_EMAIL is not set")?
        .trim()
        .to_lowercase();
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?;
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".into());

    anyhow::ensure!(is_valid_email(&email), "ADMIN_EMAIL {email:?} is not an email address");
    anyhow::ensure!(
        password.chars().count() >= MIN_PASSWORD_LEN,
        "ADMIN_PASSWORD must be at least {MIN_PASSWORD_LEN} characters"
    );

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("connect to database")?;
    portfolio::db::migrate(&pool).await?;

    let hash = hash_password(&password)?;
    let user = PgUserStore::new(pool)
        .upsert(&email, &hash, name.trim(), Role::Admin)
        .await
        .context("upsert admin user")?;

    tracing::info!(user_id = %user.id, email = %user.email, "admin account ready");
    Ok(())
}
