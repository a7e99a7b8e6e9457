pub mod attendance;
pub mod postgres_repository;
pub mod session;
