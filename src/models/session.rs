use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rocket::serde::Serialize;
use schemars::JsonSchema;
use uuid::Uuid;

/// Display format for expiry timestamps surfaced to clients (`DD/MM/YYYY HH:MM:SS`).
pub const EXPIRES_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// An attendance window identified by a rotating token.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A freshly generated token together with the moment it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCode {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct SessionResponse {
    pub success: bool,
    pub session_id: Uuid,
    pub qr_code: String,
    /// Base64-encoded SVG rendering of `qr_code`.
    pub qr_svg: String,
    pub formatted_expires_at: String,
}

impl SessionResponse {
    pub fn new(session: &Session, qr_svg: String, timezone: &DisplayTimezone) -> Self {
        Self {
            success: true,
            session_id: session.id,
            qr_code: session.token.clone(),
            qr_svg,
            formatted_expires_at: format_expires_at(&session.expires_at, &timezone.0),
        }
    }
}

/// Zone in which expiry timestamps are shown to clients.
#[derive(Debug, Clone, Copy)]
pub struct DisplayTimezone(pub Tz);

pub fn format_expires_at(expires_at: &DateTime<Utc>, timezone: &Tz) -> String {
    expires_at.with_timezone(timezone).format(EXPIRES_AT_FORMAT).to_string()
}
