use crate::error::app_error::AppError;
use base64::{Engine as _, engine::general_purpose};
use qrcode::QrCode;
use qrcode::render::svg;

/// Renders payloads as base64-encoded SVG QR symbols.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    min_dimension: u32,
}

impl QrEncoder {
    pub fn new(min_dimension: u32) -> Self {
        Self { min_dimension }
    }

    pub fn encode(&self, payload: &str) -> Result<String, AppError> {
        let svg = self.render_svg(payload)?;
        Ok(general_purpose::STANDARD.encode(svg.as_bytes()))
    }

    fn render_svg(&self, payload: &str) -> Result<String, AppError> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| AppError::qr_encoding("Failed to generate QR code", e))?;

        Ok(code
            .render::<svg::Color>()
            .min_dimensions(self.min_dimension, self.min_dimension)
            .build())
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(400)
    }
}
