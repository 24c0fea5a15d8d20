//! PostgreSQL 자격증명 저장소.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use selectshop_core::{NewUser, ShopError, ShopResult, User, UserRole};

use super::{db_error, unique_violation, UserStore};

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// `users` 테이블 행.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_digest: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = ShopError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&row.role)
            .ok_or_else(|| ShopError::Database(format!("알 수 없는 역할: {}", row.role)))?;

        Ok(User {
            id: row.id,
            username: row.username,
            password_digest: row.password_digest,
            email: row.email,
            role,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL 자격증명 저장소.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> ShopResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> ShopResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn exists_by_username(&self, username: &str) -> ShopResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn insert(&self, user: NewUser) -> ShopResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_digest, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_digest)
        .bind(&user.email)
        .bind(user.role.db_name())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let constraint = unique_violation(&e).map(str::to_owned);
            match constraint.as_deref() {
                Some(USERNAME_CONSTRAINT) => ShopError::DuplicateUsername(user.username.clone()),
                Some(EMAIL_CONSTRAINT) => ShopError::DuplicateEmail(user.email.clone()),
                _ => db_error(e),
            }
        })?;

        User::try_from(row)
    }
}
