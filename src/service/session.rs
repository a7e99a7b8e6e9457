use crate::database::session::SessionRepository;
use crate::error::app_error::AppError;
use crate::models::session::Session;
use crate::service::code::CodeGenerator;
use tracing::{info, warn};
use uuid::Uuid;

/// Fresh codes tried before a token collision is reported as a failure.
pub const MAX_TOKEN_ATTEMPTS: usize = 3;

pub struct SessionService<'a, R: ?Sized> {
    repository: &'a R,
    generator: &'a CodeGenerator,
}

impl<'a, R: SessionRepository + Sync + ?Sized> SessionService<'a, R> {
    pub fn new(repository: &'a R, generator: &'a CodeGenerator) -> Self {
        SessionService { repository, generator }
    }

    pub async fn create_session(&self) -> Result<Session, AppError> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let code = self.generator.generate();
            match self.repository.insert_session(&code).await {
                Ok(session) => {
                    info!(session_id = %session.id, expires_at = %session.expires_at, "attendance session created");
                    return Ok(session);
                }
                Err(AppError::TokenCollision { .. }) => {
                    warn!(attempt, "generated token already in use, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AppError::TokenCollision {
            attempts: MAX_TOKEN_ATTEMPTS,
        })
    }

    /// Replaces the session's token and expiry. The previous token stops
    /// resolving immediately.
    pub async fn refresh_session(&self, id: &Uuid) -> Result<Session, AppError> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let code = self.generator.generate();
            match self.repository.update_session_code(id, &code).await {
                Ok(Some(session)) => {
                    info!(session_id = %session.id, expires_at = %session.expires_at, "attendance session refreshed");
                    return Ok(session);
                }
                Ok(None) => return Err(AppError::NotFound("Session not found".to_string())),
                Err(AppError::TokenCollision { .. }) => {
                    warn!(session_id = %id, attempt, "generated token already in use, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AppError::TokenCollision {
            attempts: MAX_TOKEN_ATTEMPTS,
        })
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<Session>, AppError> {
        self.repository.get_session_by_token(token).await
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Session>, AppError> {
        self.repository.get_session_by_id(id).await
    }

    /// Strictly past `expires_at`; the expiry instant itself is still valid.
    pub fn is_expired(&self, session: &Session) -> bool {
        self.generator.now() > session.expires_at
    }
}
