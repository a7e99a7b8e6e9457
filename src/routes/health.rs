use crate::error::app_error::AppError;
use crate::models::health::HealthResponse;
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Liveness plus a round trip to the database
#[openapi(tag = "Health")]
#[get("/health")]
pub async fn healthcheck(pool: &State<PgPool>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1")
        .execute(pool.inner())
        .await
        .map_err(|e| AppError::db("Health check could not reach the database", e))?;

    Ok(Json(HealthResponse { status: "ok", database: "up" }))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![healthcheck]
}
