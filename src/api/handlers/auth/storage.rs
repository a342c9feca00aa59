//! Credential store on SQLite.
//!
//! Roles and permissions are persisted as JSON arrays and decoded into typed
//! lists at this boundary; nothing above it sees the serialized form.

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::Instrument;

use super::password::hash_password;

/// A stored user. `hashed_password` stays inside the auth module.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub hashed_password: String,
    pub user_type: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

fn decode_list(raw: &str, column: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("invalid JSON in users.{column}"))
}

fn encode_list(values: &[String]) -> Result<String> {
    serde_json::to_string(values).context("failed to serialize list column")
}

/// Look up a user by username.
/// # Errors
/// Returns an error if the query or row decoding fails.
pub async fn lookup_user(pool: &SqlitePool, username: &str) -> Result<Option<UserRecord>> {
    let query = "SELECT id, username, hashed_password, user_type, roles, permissions \
                 FROM users WHERE username = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user")?;

    row.map(|row| {
        let roles: String = row.get("roles");
        let permissions: String = row.get("permissions");
        Ok(UserRecord {
            id: row.get("id"),
            username: row.get("username"),
            hashed_password: row.get("hashed_password"),
            user_type: row.get("user_type"),
            roles: decode_list(&roles, "roles")?,
            permissions: decode_list(&permissions, "permissions")?,
        })
    })
    .transpose()
}

async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    user_type: &str,
    roles: &[String],
    permissions: &[String],
) -> Result<()> {
    let hashed = hash_password(password)?;
    let query = "INSERT INTO users (username, hashed_password, user_type, roles, permissions) \
                 VALUES ($1, $2, $3, $4, $5)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(username)
        .bind(hashed)
        .bind(user_type)
        .bind(encode_list(roles)?)
        .bind(encode_list(permissions)?)
        .execute(pool)
        .instrument(span)
        .await
        .with_context(|| format!("failed to insert user {username}"))?;

    Ok(())
}

async fn backfill_attributes(
    pool: &SqlitePool,
    record: &UserRecord,
    roles: &[String],
    permissions: &[String],
) -> Result<()> {
    // Earlier deployments seeded users without roles/permissions; fill the
    // blanks without touching rows an operator already customized.
    let roles = if record.roles.is_empty() {
        Some(encode_list(roles)?)
    } else {
        None
    };
    let permissions = if record.permissions.is_empty() {
        Some(encode_list(permissions)?)
    } else {
        None
    };
    if roles.is_none() && permissions.is_none() {
        return Ok(());
    }

    let query = "UPDATE users SET \
                 roles = COALESCE($1, roles), \
                 permissions = COALESCE($2, permissions) \
                 WHERE id = $3";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(roles)
        .bind(permissions)
        .bind(record.id)
        .execute(pool)
        .instrument(span)
        .await
        .with_context(|| format!("failed to backfill user {}", record.username))?;

    Ok(())
}

async fn ensure_seed_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    user_type: &str,
    roles: &[String],
    permissions: &[String],
) -> Result<()> {
    match lookup_user(pool, username).await? {
        Some(record) => backfill_attributes(pool, &record, roles, permissions).await,
        None => insert_user(pool, username, password, user_type, roles, permissions).await,
    }
}

/// Create the credential table and seed the default accounts.
/// # Errors
/// Returns an error if schema creation or seeding fails.
pub async fn init_db(pool: &SqlitePool) -> Result<()> {
    let query = "CREATE TABLE IF NOT EXISTS users (\
                 id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 username TEXT NOT NULL UNIQUE, \
                 hashed_password TEXT NOT NULL, \
                 user_type TEXT NOT NULL, \
                 roles TEXT NOT NULL DEFAULT '[]', \
                 permissions TEXT NOT NULL DEFAULT '[]')";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "CREATE TABLE",
        db.statement = query
    );
    sqlx::query(query)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to create users table")?;

    ensure_seed_user(
        pool,
        "admin",
        "admin123",
        "admin",
        &["admin".to_string()],
        &[
            "view_pc".to_string(),
            "view_fs".to_string(),
            "manage_users".to_string(),
        ],
    )
    .await?;

    ensure_seed_user(
        pool,
        "user",
        "user123",
        "internal",
        &["user".to_string()],
        &["view_pc".to_string()],
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::password::verify_password;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> Result<SqlitePool> {
        // One connection so every query sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(pool)
    }

    #[tokio::test]
    async fn init_db_seeds_default_accounts() -> Result<()> {
        let pool = pool().await?;
        init_db(&pool).await?;

        let admin = lookup_user(&pool, "admin")
            .await?
            .context("admin should be seeded")?;
        assert_eq!(admin.user_type, "admin");
        assert_eq!(admin.roles, vec!["admin".to_string()]);
        assert_eq!(
            admin.permissions,
            vec![
                "view_pc".to_string(),
                "view_fs".to_string(),
                "manage_users".to_string()
            ]
        );
        assert!(verify_password("admin123", &admin.hashed_password));

        let user = lookup_user(&pool, "user")
            .await?
            .context("user should be seeded")?;
        assert_eq!(user.user_type, "internal");
        assert_eq!(user.roles, vec!["user".to_string()]);
        assert_eq!(user.permissions, vec!["view_pc".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn lookup_missing_user_is_none() -> Result<()> {
        let pool = pool().await?;
        init_db(&pool).await?;
        assert!(lookup_user(&pool, "nobody").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn init_db_is_idempotent() -> Result<()> {
        let pool = pool().await?;
        init_db(&pool).await?;
        init_db(&pool).await?;

        let admin = lookup_user(&pool, "admin")
            .await?
            .context("admin should survive reseeding")?;
        assert_eq!(admin.roles, vec!["admin".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn init_db_backfills_empty_attributes() -> Result<()> {
        let pool = pool().await?;
        init_db(&pool).await?;

        sqlx::query("UPDATE users SET roles = '[]', permissions = '[]' WHERE username = 'admin'")
            .execute(&pool)
            .await?;

        init_db(&pool).await?;
        let admin = lookup_user(&pool, "admin")
            .await?
            .context("admin should exist")?;
        assert_eq!(admin.roles, vec!["admin".to_string()]);
        assert_eq!(
            admin.permissions,
            vec![
                "view_pc".to_string(),
                "view_fs".to_string(),
                "manage_users".to_string()
            ]
        );
        Ok(())
    }
}
