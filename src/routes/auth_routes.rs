use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::post,
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{
    AccessTokenResponse, LoginRequest, RefreshRequest, RegisterAccountRequest, RegisteredAccountResponse,
    TokenPairResponse,
};
use crate::middleware::auth::{optional_auth, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;

/// Rutas públicas de autenticación. El registro lee el actor si llega un token.
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login/", post(login))
        .route("/refresh-token/", post(refresh_token))
        .route(
            "/register/usuario/",
            post(register_account).route_layer(middleware::from_fn_with_state(state, optional_auth)),
        )
}

fn controller(state: &AppState) -> AuthController {
    AuthController::new(state.accounts())
}

async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    Ok(Json(controller(&state).login(request).await?))
}

async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    Ok(Json(controller(&state).refresh(request)?))
}

async fn register_account(
    State(state): State<AppState>,
    actor: Option<Extension<AuthenticatedUser>>,
    JsonBody(request): JsonBody<RegisterAccountRequest>,
) -> Result<(StatusCode, Json<RegisteredAccountResponse>), AppError> {
    let actor = actor.map(|Extension(user)| user);
    let response = controller(&state).register(request, actor.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
