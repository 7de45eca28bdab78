//! Request middleware

pub mod session;

pub use session::{redirect_authenticated, session_gate, SessionClaims};
