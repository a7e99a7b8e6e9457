use crate::database::attendance::AttendanceRepository;
use crate::database::session::SessionRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::Attendance;
use crate::service::code::CodeGenerator;
use crate::service::session::SessionService;
use tracing::{info, warn};
use uuid::Uuid;

pub struct AttendanceService<'a, R: ?Sized> {
    repository: &'a R,
    sessions: SessionService<'a, R>,
}

impl<'a, R: SessionRepository + AttendanceRepository + Sync + ?Sized> AttendanceService<'a, R> {
    pub fn new(repository: &'a R, generator: &'a CodeGenerator) -> Self {
        AttendanceService {
            repository,
            sessions: SessionService::new(repository, generator),
        }
    }

    /// Records a student's submission of a session token.
    ///
    /// Checks run in a fixed order: unknown token, then expiry, then an
    /// existing record for the student. An expired submission still writes an
    /// absence, unless the student already has a record for that session. The
    /// duplicate guard is the store's unique constraint, so concurrent
    /// submissions cannot both land.
    pub async fn mark_attendance(&self, student_id: &str, token: &str) -> Result<Attendance, AppError> {
        let Some(session) = self.sessions.find_by_token(token).await? else {
            warn!(student_id, "attendance submitted with unknown token");
            return Err(AppError::InvalidCode);
        };

        if self.sessions.is_expired(&session) {
            return match self.repository.record_attendance(student_id, &session.id, false).await? {
                Some(_) => {
                    warn!(student_id, session_id = %session.id, "late submission recorded as absent");
                    Err(AppError::Expired)
                }
                None => {
                    warn!(student_id, session_id = %session.id, "late resubmission ignored");
                    Err(AppError::AlreadyMarked)
                }
            };
        }

        match self.repository.record_attendance(student_id, &session.id, true).await? {
            Some(attendance) => {
                info!(student_id, session_id = %session.id, "attendance marked");
                Ok(attendance)
            }
            None => {
                warn!(student_id, session_id = %session.id, "attendance already marked");
                Err(AppError::AlreadyMarked)
            }
        }
    }

    pub async fn list_session_attendance(&self, session_id: &Uuid) -> Result<Vec<Attendance>, AppError> {
        if self.sessions.find_by_id(session_id).await?.is_none() {
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        self.repository.list_attendance_for_session(session_id).await
    }
}
