//! Colo API - HTTP surface for camp operations
//!
//! Admin proxy endpoints (signup, password reset, projects, payment
//! webhook), camp CRUD endpoints, the session gate and the server setup.

pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::{create_server, run_server, start_background_server};
pub use state::{ApiConfig, AppState};
