//! Session validation boundary. Accounts, login, and token issuance live in
//! a separate identity system; this service only answers "who is behind this
//! cookie" and whether that identity may use the admin surface.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// A validated, unexpired session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct SessionRow {
    id: String,
    user_id: String,
    expires_at: NaiveDateTime,
    created_at: NaiveDateTime,
}

/// Decides whether a validated session may act as an administrator. The
/// default accepts any valid session, matching a deployment where only staff
/// are ever issued sessions; a stricter deployment swaps in its own check.
pub type AdminPolicy = Box<dyn Fn(&Session) -> bool + Send + Sync>;

pub fn allow_any_session() -> AdminPolicy {
    Box::new(|_session| true)
}

pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Looks up the session behind a bearer token, rejecting expired rows and
    /// touching `last_used_at` on success.
    pub async fn validate_token(&self, token: &str) -> Result<Option<Session>> {
        let token_hash = hash_token(token);
        let now = Utc::now();
        let now_naive = now.naive_utc();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, expires_at, created_at
            FROM sessions
            WHERE token_hash = ? AND expires_at > ?
            "#
        )
        .bind(&token_hash)
        .bind(now_naive)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            sqlx::query("UPDATE sessions SET last_used_at = ? WHERE id = ?")
                .bind(now_naive)
                .bind(&row.id)
                .execute(&self.pool)
                .await?;

            Ok(Some(Session {
                id: row.id,
                user_id: Uuid::parse_str(&row.user_id)
                    .map_err(|e| AppError::Database(e.to_string()))?,
                expires_at: DateTime::from_naive_utc_and_offset(row.expires_at, Utc),
                created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            }))
        } else {
            Ok(None)
        }
    }

    /// Inserts a session row for a known token. The identity system normally
    /// does this; it exists here for seeding test fixtures and local setups.
    pub async fn create_session(&self, user_id: Uuid, token: &str, ttl_hours: i64) -> Result<Session> {
        let id = Uuid::new_v4().to_string();
        let token_hash = hash_token(token);
        let now = Utc::now();
        let expires_at = now + Duration::hours(ttl_hours);

        let user_id_str = user_id.to_string();

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at, last_used_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id)
        .bind(&user_id_str)
        .bind(&token_hash)
        .bind(expires_at.naive_utc())
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(Session {
            id,
            user_id,
            expires_at,
            created_at: now,
        })
    }

    pub async fn cleanup_expired(&self) -> Result<u64> {
        let now_naive = Utc::now().naive_utc();
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now_naive)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
