//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Store;
use crate::services::account_service::AccountService;
use crate::services::jwt_service::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: EnvironmentConfig,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: EnvironmentConfig) -> Self {
        let jwt = JwtService::new(&config);
        Self { store, config, jwt }
    }

    /// Servicio de cuentas sobre el store y la configuración actuales
    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.store.clone(), self.jwt.clone(), self.config.bcrypt_cost)
    }
}
