//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, external_id, email, display_name, avatar_url, created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by the subject id assigned by the identity provider.
    pub async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_external_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, external_id, email, display_name, avatar_url, created_at, updated_at, last_login_at
            FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new user record from an identity-provider profile.
    pub async fn create(
        &self,
        external_id: &str,
        email: &str,
        display_name: &str,
        avatar_url: Option<&str>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (external_id, email, display_name, avatar_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, external_id, email, display_name, avatar_url, created_at, updated_at, last_login_at
            "#,
        )
        .bind(external_id)
        .bind(email.to_lowercase())
        .bind(display_name)
        .bind(avatar_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("touch_user_last_login");
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // UserRepository tests require a database connection and are covered
    // by the auth integration tests.
}
