pub mod attendance;
pub mod code;
pub mod qr;
pub mod session;
