use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::catalog_controller::CatalogController;
use crate::dto::catalog_dto::{CopierDetail, CopierWriteRequest, NamedWriteRequest};
use crate::models::catalog::{Brand, Feature};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;

pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/marcas/", get(list_brands).post(create_brand))
        .route(
            "/marcas/:id/",
            get(get_brand).put(replace_brand).patch(patch_brand).delete(delete_brand),
        )
        .route("/funcionalidades/", get(list_features).post(create_feature))
        .route(
            "/funcionalidades/:id/",
            get(get_feature)
                .put(replace_feature)
                .patch(patch_feature)
                .delete(delete_feature),
        )
        .route("/copiadoras/", get(list_copiers).post(create_copier))
        .route(
            "/copiadoras/:id/",
            get(get_copier)
                .put(replace_copier)
                .patch(patch_copier)
                .delete(delete_copier),
        )
}

fn controller(state: &AppState) -> CatalogController {
    CatalogController::new(state.store.clone())
}

// ----- Marcas -----

async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<Brand>>, AppError> {
    Ok(Json(controller(&state).list_brands().await?))
}

async fn get_brand(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Brand>, AppError> {
    Ok(Json(controller(&state).get_brand(id).await?))
}

async fn create_brand(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NamedWriteRequest>,
) -> Result<(StatusCode, Json<Brand>), AppError> {
    let brand = controller(&state).create_brand(request).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

async fn replace_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<NamedWriteRequest>,
) -> Result<Json<Brand>, AppError> {
    Ok(Json(controller(&state).update_brand(id, request, false).await?))
}

async fn patch_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<NamedWriteRequest>,
) -> Result<Json<Brand>, AppError> {
    Ok(Json(controller(&state).update_brand(id, request, true).await?))
}

async fn delete_brand(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    controller(&state).delete_brand(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- Funcionalidades -----

async fn list_features(State(state): State<AppState>) -> Result<Json<Vec<Feature>>, AppError> {
    Ok(Json(controller(&state).list_features().await?))
}

async fn get_feature(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Feature>, AppError> {
    Ok(Json(controller(&state).get_feature(id).await?))
}

async fn create_feature(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NamedWriteRequest>,
) -> Result<(StatusCode, Json<Feature>), AppError> {
    let feature = controller(&state).create_feature(request).await?;
    Ok((StatusCode::CREATED, Json(feature)))
}

async fn replace_feature(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<NamedWriteRequest>,
) -> Result<Json<Feature>, AppError> {
    Ok(Json(controller(&state).update_feature(id, request, false).await?))
}

async fn patch_feature(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<NamedWriteRequest>,
) -> Result<Json<Feature>, AppError> {
    Ok(Json(controller(&state).update_feature(id, request, true).await?))
}

async fn delete_feature(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    controller(&state).delete_feature(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- Copiadoras -----

async fn list_copiers(State(state): State<AppState>) -> Result<Json<Vec<CopierDetail>>, AppError> {
    Ok(Json(controller(&state).list_copiers().await?))
}

async fn get_copier(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<CopierDetail>, AppError> {
    Ok(Json(controller(&state).get_copier(id).await?))
}

async fn create_copier(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CopierWriteRequest>,
) -> Result<(StatusCode, Json<CopierDetail>), AppError> {
    let copier = controller(&state).create_copier(request).await?;
    Ok((StatusCode::CREATED, Json(copier)))
}

async fn replace_copier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<CopierWriteRequest>,
) -> Result<Json<CopierDetail>, AppError> {
    Ok(Json(controller(&state).update_copier(id, request, false).await?))
}

async fn patch_copier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<CopierWriteRequest>,
) -> Result<Json<CopierDetail>, AppError> {
    Ok(Json(controller(&state).update_copier(id, request, true).await?))
}

async fn delete_copier(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    controller(&state).delete_copier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
