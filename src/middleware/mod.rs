//! Middleware del sistema
//!
//! Autenticación JWT (obligatoria u opcional) y CORS.

pub mod auth;
pub mod cors;

pub use auth::{optional_auth, require_auth, AuthenticatedUser};
pub use cors::cors_layer;
