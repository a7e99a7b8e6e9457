use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::attendance::{AttendanceRequest, AttendanceResponse};
use crate::service::attendance::AttendanceService;
use crate::service::code::CodeGenerator;
use rocket::serde::json::Json;
use rocket::{State, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use validator::Validate;

/// Mark a student present by submitting the code read from a session's QR image
#[openapi(tag = "Attendance")]
#[post("/attendance", data = "<payload>")]
pub async fn mark_attendance(
    pool: &State<PgPool>,
    generator: &State<CodeGenerator>,
    payload: JsonBody<AttendanceRequest>,
) -> Result<Json<AttendanceResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    AttendanceService::new(&repo, generator.inner())
        .mark_attendance(&payload.student_id, &payload.qr_code)
        .await?;

    Ok(Json(AttendanceResponse::marked()))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![mark_attendance]
}
