use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::location_controller::LocationController;
use crate::dto::location_dto::{
    AddressDetail, CityDetail, NeighborhoodDetail, RegisterLocationRequest, RegisteredLocationResponse,
};
use crate::models::location::State as Uf;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;

/// Registro público de localización
pub fn create_public_location_router() -> Router<AppState> {
    Router::new().route("/registrar/localizacao/", post(register_location))
}

/// Lecturas de datos de referencia y endereços (requieren token)
pub fn create_location_router() -> Router<AppState> {
    Router::new()
        .route("/ufs/", get(list_states))
        .route("/cidades/", get(list_cities))
        .route("/bairros/", get(list_neighborhoods))
        .route("/enderecos/", get(list_addresses))
        .route("/enderecos/:id/", get(get_address).delete(delete_address))
}

fn controller(state: &AppState) -> LocationController {
    LocationController::new(state.store.clone())
}

async fn register_location(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterLocationRequest>,
) -> Result<(StatusCode, Json<RegisteredLocationResponse>), AppError> {
    let response = controller(&state).register_location(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_states(State(state): State<AppState>) -> Result<Json<Vec<Uf>>, AppError> {
    Ok(Json(controller(&state).list_states().await?))
}

async fn list_cities(State(state): State<AppState>) -> Result<Json<Vec<CityDetail>>, AppError> {
    Ok(Json(controller(&state).list_cities().await?))
}

async fn list_neighborhoods(State(state): State<AppState>) -> Result<Json<Vec<NeighborhoodDetail>>, AppError> {
    Ok(Json(controller(&state).list_neighborhoods().await?))
}

async fn list_addresses(State(state): State<AppState>) -> Result<Json<Vec<AddressDetail>>, AppError> {
    Ok(Json(controller(&state).list_addresses().await?))
}

async fn get_address(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<AddressDetail>, AppError> {
    Ok(Json(controller(&state).get_address(id).await?))
}

async fn delete_address(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    controller(&state).delete_address(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
