use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::person_controller::PersonController;
use crate::dto::person_dto::{CustomerDetail, CustomerWriteRequest, EmployeeDetail, EmployeeWriteRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;

pub fn create_person_router() -> Router<AppState> {
    Router::new()
        .route("/clientes/", get(list_customers).post(create_customer))
        .route(
            "/clientes/:id/",
            get(get_customer)
                .put(replace_customer)
                .patch(patch_customer)
                .delete(delete_customer),
        )
        .route("/funcionarios/", get(list_employees).post(create_employee))
        .route(
            "/funcionarios/:id/",
            get(get_employee)
                .put(replace_employee)
                .patch(patch_employee)
                .delete(delete_employee),
        )
}

fn controller(state: &AppState) -> PersonController {
    PersonController::new(state.store.clone())
}

async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<CustomerDetail>>, AppError> {
    Ok(Json(controller(&state).list_customers().await?))
}

async fn get_customer(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<CustomerDetail>, AppError> {
    Ok(Json(controller(&state).get_customer(id).await?))
}

async fn create_customer(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CustomerWriteRequest>,
) -> Result<(StatusCode, Json<CustomerDetail>), AppError> {
    let detail = controller(&state).create_customer(request).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn replace_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<CustomerWriteRequest>,
) -> Result<Json<CustomerDetail>, AppError> {
    Ok(Json(controller(&state).update_customer(id, request, false).await?))
}

async fn patch_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<CustomerWriteRequest>,
) -> Result<Json<CustomerDetail>, AppError> {
    Ok(Json(controller(&state).update_customer(id, request, true).await?))
}

async fn delete_customer(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    controller(&state).delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<EmployeeDetail>>, AppError> {
    Ok(Json(controller(&state).list_employees().await?))
}

async fn get_employee(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<EmployeeDetail>, AppError> {
    Ok(Json(controller(&state).get_employee(id).await?))
}

async fn create_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<EmployeeWriteRequest>,
) -> Result<(StatusCode, Json<EmployeeDetail>), AppError> {
    let detail = controller(&state).create_employee(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn replace_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<EmployeeWriteRequest>,
) -> Result<Json<EmployeeDetail>, AppError> {
    Ok(Json(controller(&state).update_employee(&actor, id, request, false).await?))
}

async fn patch_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<EmployeeWriteRequest>,
) -> Result<Json<EmployeeDetail>, AppError> {
    Ok(Json(controller(&state).update_employee(&actor, id, request, true).await?))
}

async fn delete_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    controller(&state).delete_employee(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
