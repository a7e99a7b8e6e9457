use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::Attendance;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait AttendanceRepository {
    /// Writes the record unless one already exists for the same student and
    /// session, in which case nothing is written and `None` is returned.
    async fn record_attendance(&self, student_id: &str, session_id: &Uuid, is_present: bool) -> Result<Option<Attendance>, AppError>;
    async fn list_attendance_for_session(&self, session_id: &Uuid) -> Result<Vec<Attendance>, AppError>;
}

#[async_trait::async_trait]
impl AttendanceRepository for PostgresRepository {
    async fn record_attendance(&self, student_id: &str, session_id: &Uuid, is_present: bool) -> Result<Option<Attendance>, AppError> {
        // The unique (student_id, session_id) constraint arbitrates concurrent submissions.
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance (student_id, session_id, is_present)
            VALUES ($1, $2, $3)
            ON CONFLICT (student_id, session_id) DO NOTHING
            RETURNING id, student_id, session_id, is_present, created_at
            "#,
        )
        .bind(student_id)
        .bind(session_id)
        .bind(is_present)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    async fn list_attendance_for_session(&self, session_id: &Uuid) -> Result<Vec<Attendance>, AppError> {
        let records = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, student_id, session_id, is_present, created_at
            FROM attendance
            WHERE session_id = $1
            ORDER BY created_at, student_id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
