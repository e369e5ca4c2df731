//! Router de la API
//!
//! Rutas públicas (login, refresh, registro de cuentas y de localización,
//! sitio) y rutas protegidas con Bearer token para las colecciones.

use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{AdminSiteConfig, ADMIN_SITE};
use crate::middleware::{cors_layer, require_auth};
use crate::state::AppState;

pub mod auth_routes;
pub mod billing_routes;
pub mod catalog_routes;
pub mod location_routes;
pub mod person_routes;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Construye el router completo con sus layers
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(person_routes::create_person_router())
        .merge(catalog_routes::create_catalog_router())
        .merge(billing_routes::create_billing_router())
        .merge(location_routes::create_location_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let public = Router::new()
        .route("/health", get(health_check))
        .route("/site/", get(site_config))
        .merge(auth_routes::create_auth_router(state.clone()))
        .merge(location_routes::create_public_location_router());

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "intersul-backoffice",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn site_config() -> Json<AdminSiteConfig> {
    Json(ADMIN_SITE)
}
