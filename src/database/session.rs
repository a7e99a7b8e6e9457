use crate::database::postgres_repository::{PostgresRepository, is_unique_violation};
use crate::error::app_error::AppError;
use crate::models::session::{Session, SessionCode};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait SessionRepository {
    /// Persists a new session. A token already held by another session fails
    /// with `AppError::TokenCollision`.
    async fn insert_session(&self, code: &SessionCode) -> Result<Session, AppError>;
    async fn get_session_by_id(&self, id: &Uuid) -> Result<Option<Session>, AppError>;
    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>, AppError>;
    /// Overwrites token and expiry in place. `None` when no session has `id`.
    async fn update_session_code(&self, id: &Uuid, code: &SessionCode) -> Result<Option<Session>, AppError>;
}

fn collision_or_db(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::TokenCollision { attempts: 1 }
    } else {
        err.into()
    }
}

#[async_trait::async_trait]
impl SessionRepository for PostgresRepository {
    async fn insert_session(&self, code: &SessionCode) -> Result<Session, AppError> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO attendance_session (token, expires_at)
            VALUES ($1, $2)
            RETURNING id, token, expires_at, created_at, updated_at
            "#,
        )
        .bind(&code.token)
        .bind(code.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(collision_or_db)
    }

    async fn get_session_by_id(&self, id: &Uuid) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, token, expires_at, created_at, updated_at
            FROM attendance_session
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, token, expires_at, created_at, updated_at
            FROM attendance_session
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn update_session_code(&self, id: &Uuid, code: &SessionCode) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>(
            r#"
            UPDATE attendance_session
            SET token = $2, expires_at = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, token, expires_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&code.token)
        .bind(code.expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(collision_or_db)
    }
}
