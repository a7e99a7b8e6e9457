use crate::routes::error::ErrorResponse;
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use rocket_okapi::OpenApiError;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use std::io::Cursor;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid QR code")]
    InvalidCode,
    #[error("QR code has expired")]
    Expired,
    #[error("Attendance already marked")]
    AlreadyMarked,
    #[error("{0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Internal server error")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    #[error("Internal server error")]
    TokenCollision { attempts: usize },
    #[error("Internal server error")]
    QrEncoding { message: String },
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }

    pub fn qr_encoding(message: impl Into<String>, source: qrcode::types::QrError) -> Self {
        Self::QrEncoding {
            message: format!("{}: {}", message.into(), source),
        }
    }

    /// Rejections a client can act on, as opposed to faults on our side.
    pub fn is_client_error(&self) -> bool {
        Status::from(self).class().is_client_error()
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::InvalidCode => Status::BadRequest,
            AppError::Expired => Status::BadRequest,
            AppError::AlreadyMarked => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::Db { .. } => Status::InternalServerError,
            AppError::TokenCollision { .. } => Status::InternalServerError,
            AppError::QrEncoding { .. } => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        if self.is_client_error() {
            warn!(
                error = %self,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                "request rejected"
            );
        } else {
            error!(
                error = ?self,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                "request failed"
            );
        }

        let status = Status::from(&self);
        let body = ErrorResponse::new(self.to_string()).to_json();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
        let mut responses = Responses::default();
        for (code, description) in [
            ("400", "Invalid, expired or duplicate submission"),
            ("404", "Not Found"),
            ("422", "Malformed request body"),
            ("500", "Internal Server Error"),
        ] {
            responses.responses.insert(
                code.to_string(),
                RefOr::Object(OpenApiResponse {
                    description: description.to_string(),
                    ..Default::default()
                }),
            );
        }
        Ok(responses)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::db("Database error", e),
        }
    }
}
