use crate::database::attendance::AttendanceRepository;
use crate::database::session::SessionRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::Attendance;
use crate::models::session::{Session, SessionCode};
use crate::service::code::{Clock, SystemClock, TokenSource};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
}

/// Clock that only moves when told to.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Hands out a scripted list of tokens, then `token-<n>` once exhausted.
#[derive(Default)]
pub struct SequenceTokens {
    queued: Mutex<VecDeque<String>>,
    issued: Mutex<usize>,
}

impl SequenceTokens {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            queued: Mutex::new(tokens.iter().map(|t| t.to_string()).collect()),
            issued: Mutex::new(0),
        }
    }
}

impl TokenSource for SequenceTokens {
    fn next_token(&self) -> String {
        let mut issued = self.issued.lock().unwrap();
        *issued += 1;
        self.queued.lock().unwrap().pop_front().unwrap_or_else(|| format!("token-{}", issued))
    }
}

/// In-memory store that enforces the same unique constraints as the schema.
///
/// Row timestamps come from `clock`, so listings order the way the
/// `ORDER BY created_at, student_id` query does.
pub struct MockRepository {
    pub sessions: Mutex<Vec<Session>>,
    pub attendance: Mutex<Vec<Attendance>>,
    clock: Arc<dyn Clock>,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl MockRepository {
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
            attendance: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub fn attendance_rows(&self) -> Vec<Attendance> {
        self.attendance.lock().unwrap().clone()
    }

    pub fn rows_for(&self, student_id: &str) -> Vec<Attendance> {
        self.attendance_rows().into_iter().filter(|a| a.student_id == student_id).collect()
    }

    fn token_taken(sessions: &[Session], token: &str, except: Option<&Uuid>) -> bool {
        sessions.iter().any(|s| s.token == token && Some(&s.id) != except)
    }
}

#[async_trait::async_trait]
impl SessionRepository for MockRepository {
    async fn insert_session(&self, code: &SessionCode) -> Result<Session, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        if Self::token_taken(&sessions, &code.token, None) {
            return Err(AppError::TokenCollision { attempts: 1 });
        }

        let now = self.clock.now();
        let session = Session {
            id: Uuid::new_v4(),
            token: code.token.clone(),
            expires_at: code.expires_at,
            created_at: now,
            updated_at: now,
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn get_session_by_id(&self, id: &Uuid) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.lock().unwrap().iter().find(|s| &s.id == id).cloned())
    }

    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.lock().unwrap().iter().find(|s| s.token == token).cloned())
    }

    async fn update_session_code(&self, id: &Uuid, code: &SessionCode) -> Result<Option<Session>, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        if Self::token_taken(&sessions, &code.token, Some(id)) {
            return Err(AppError::TokenCollision { attempts: 1 });
        }

        Ok(sessions.iter_mut().find(|s| &s.id == id).map(|session| {
            session.token = code.token.clone();
            session.expires_at = code.expires_at;
            session.updated_at = self.clock.now();
            session.clone()
        }))
    }
}

#[async_trait::async_trait]
impl AttendanceRepository for MockRepository {
    async fn record_attendance(&self, student_id: &str, session_id: &Uuid, is_present: bool) -> Result<Option<Attendance>, AppError> {
        let mut rows = self.attendance.lock().unwrap();
        if rows.iter().any(|a| a.student_id == student_id && &a.session_id == session_id) {
            return Ok(None);
        }

        let attendance = Attendance {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            session_id: *session_id,
            is_present,
            created_at: self.clock.now(),
        };
        rows.push(attendance.clone());
        Ok(Some(attendance))
    }

    async fn list_attendance_for_session(&self, session_id: &Uuid) -> Result<Vec<Attendance>, AppError> {
        let mut records: Vec<Attendance> = self.attendance.lock().unwrap().iter().filter(|a| &a.session_id == session_id).cloned().collect();
        records.sort_by(|a, b| (a.created_at, &a.student_id).cmp(&(b.created_at, &b.student_id)));
        Ok(records)
    }
}
