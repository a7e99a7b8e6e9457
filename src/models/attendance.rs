use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

pub const ATTENDANCE_MARKED_MESSAGE: &str = "Attendance marked successfully";

/// Outcome of one student's submission against one session.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub student_id: String,
    pub session_id: Uuid,
    pub is_present: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct AttendanceRequest {
    #[validate(length(min = 1, max = 64))]
    pub student_id: String,
    /// Token read from the session's QR image. Any non-empty value is looked up.
    #[validate(length(min = 1))]
    pub qr_code: String,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct AttendanceResponse {
    pub success: bool,
    pub message: String,
}

impl AttendanceResponse {
    pub fn marked() -> Self {
        Self {
            success: true,
            message: ATTENDANCE_MARKED_MESSAGE.to_string(),
        }
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct AttendanceRecordResponse {
    pub id: Uuid,
    pub student_id: String,
    pub is_present: bool,
    pub recorded_at: DateTime<Utc>,
}

impl From<&Attendance> for AttendanceRecordResponse {
    fn from(attendance: &Attendance) -> Self {
        Self {
            id: attendance.id,
            student_id: attendance.student_id.clone(),
            is_present: attendance.is_present,
            recorded_at: attendance.created_at,
        }
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct SessionAttendanceResponse {
    pub success: bool,
    pub session_id: Uuid,
    pub present: usize,
    pub absent: usize,
    pub records: Vec<AttendanceRecordResponse>,
}

impl SessionAttendanceResponse {
    pub fn new(session_id: Uuid, records: &[Attendance]) -> Self {
        let present = records.iter().filter(|record| record.is_present).count();
        Self {
            success: true,
            session_id,
            present,
            absent: records.len() - present,
            records: records.iter().map(AttendanceRecordResponse::from).collect(),
        }
    }
}
