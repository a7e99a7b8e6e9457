pub mod attendance;
pub mod error;
pub mod health;
pub mod session;
