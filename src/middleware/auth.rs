//! Middleware de autenticación JWT
//!
//! Extrae el Bearer token, lo valida como access token y comprueba que la
//! cuenta sigue existiendo. El actor resultante se inyecta en las
//! extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::models::person::Department;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub account_id: i64,
    pub username: String,
    pub is_superuser: bool,
    /// Setor, si la cuenta está vinculada a un funcionario
    pub department: Option<Department>,
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Rutas protegidas: sin token válido -> 401
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?
        .to_string();

    let user = state.accounts().authenticate(&token).await?;
    debug!("🔐 {} {} por '{}'", request.method(), request.uri().path(), user.username);

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Rutas públicas que cambian de comportamiento con un actor autenticado.
/// Sin header se continúa como anónimo; un token presente pero inválido es 401.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(&request).map(str::to_string) {
        let user = state.accounts().authenticate(&token).await?;
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}
