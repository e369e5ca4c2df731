use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::billing_controller::BillingController;
use crate::dto::billing_dto::BillingPeriodWriteRequest;
use crate::dto::copier_instance_dto::{CopierInstanceDetail, CopierInstanceWriteRequest};
use crate::models::billing::BillingPeriod;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;

pub fn create_billing_router() -> Router<AppState> {
    Router::new()
        .route("/franquias/", get(list_billing_periods).post(create_billing_period))
        .route(
            "/franquias/:id/",
            get(get_billing_period)
                .put(replace_billing_period)
                .patch(patch_billing_period)
                .delete(delete_billing_period),
        )
        .route("/copiadora-clientes/", get(list_instances).post(create_instance))
        .route(
            "/copiadora-clientes/:id/",
            get(get_instance)
                .put(replace_instance)
                .patch(patch_instance)
                .delete(delete_instance),
        )
}

fn controller(state: &AppState) -> BillingController {
    BillingController::new(state.store.clone())
}

async fn list_billing_periods(State(state): State<AppState>) -> Result<Json<Vec<BillingPeriod>>, AppError> {
    Ok(Json(controller(&state).list_billing_periods().await?))
}

async fn get_billing_period(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<BillingPeriod>, AppError> {
    Ok(Json(controller(&state).get_billing_period(id).await?))
}

async fn create_billing_period(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BillingPeriodWriteRequest>,
) -> Result<(StatusCode, Json<BillingPeriod>), AppError> {
    let period = controller(&state).create_billing_period(request).await?;
    Ok((StatusCode::CREATED, Json(period)))
}

async fn replace_billing_period(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<BillingPeriodWriteRequest>,
) -> Result<Json<BillingPeriod>, AppError> {
    Ok(Json(controller(&state).update_billing_period(id, request, false).await?))
}

async fn patch_billing_period(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<BillingPeriodWriteRequest>,
) -> Result<Json<BillingPeriod>, AppError> {
    Ok(Json(controller(&state).update_billing_period(id, request, true).await?))
}

async fn delete_billing_period(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    controller(&state).delete_billing_period(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_instances(State(state): State<AppState>) -> Result<Json<Vec<CopierInstanceDetail>>, AppError> {
    Ok(Json(controller(&state).list_copier_instances().await?))
}

async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CopierInstanceDetail>, AppError> {
    Ok(Json(controller(&state).get_copier_instance(id).await?))
}

async fn create_instance(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CopierInstanceWriteRequest>,
) -> Result<(StatusCode, Json<CopierInstanceDetail>), AppError> {
    let detail = controller(&state).create_copier_instance(request).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn replace_instance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<CopierInstanceWriteRequest>,
) -> Result<Json<CopierInstanceDetail>, AppError> {
    Ok(Json(controller(&state).update_copier_instance(id, request, false).await?))
}

async fn patch_instance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<CopierInstanceWriteRequest>,
) -> Result<Json<CopierInstanceDetail>, AppError> {
    Ok(Json(controller(&state).update_copier_instance(id, request, true).await?))
}

async fn delete_instance(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    controller(&state).delete_copier_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
