use rocket::serde::Serialize;
use rocket::serde::json::{Json, serde_json};
use rocket::{Request, catch};
use schemars::JsonSchema;

/// Body of every failed response.
#[derive(Serialize, Debug, JsonSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"success":false,"message":"Internal server error"}"#.to_string())
    }
}

#[catch(400)]
pub fn bad_request(_: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Bad request"))
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Not found"))
}

#[catch(413)]
pub fn payload_too_large(_: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Payload too large"))
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Malformed request body"))
}

#[catch(500)]
pub fn internal_error(_: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_has_success_flag() {
        let body: serde_json::Value = serde_json::from_str(&ErrorResponse::new("Invalid QR code").to_json()).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid QR code");
    }
}
