use crate::models::session::SessionCode;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of opaque session tokens.
pub trait TokenSource: Send + Sync {
    fn next_token(&self) -> String;
}

/// 128-bit random tokens in hyphenated UUID form.
pub struct UuidTokenSource;

impl TokenSource for UuidTokenSource {
    fn next_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Issues session codes: a fresh token valid for `validity` from now.
#[derive(Clone)]
pub struct CodeGenerator {
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenSource>,
    validity: Duration,
}

impl CodeGenerator {
    pub fn new(clock: Arc<dyn Clock>, tokens: Arc<dyn TokenSource>, validity: Duration) -> Self {
        Self { clock, tokens, validity }
    }

    pub fn system(validity: Duration) -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidTokenSource), validity)
    }

    pub fn generate(&self) -> SessionCode {
        SessionCode {
            token: self.tokens.next_token(),
            expires_at: self.clock.now() + self.validity,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
