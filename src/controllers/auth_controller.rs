//! Controller de autenticación
//!
//! Login, refresh y registro de cuentas vinculadas a personas.

use tracing::info;

use crate::dto::auth_dto::{
    AccessTokenResponse, LoginRequest, RefreshRequest, RegisterAccountRequest, RegisteredAccountResponse,
    TokenPairResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::account::AccountResponse;
use crate::services::account_service::AccountService;
use crate::utils::errors::AppResult;

pub struct AuthController {
    accounts: AccountService,
}

impl AuthController {
    pub fn new(accounts: AccountService) -> Self {
        Self { accounts }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<TokenPairResponse> {
        let pair = self.accounts.login(request).await?;
        Ok(TokenPairResponse::new(pair.access, pair.refresh))
    }

    pub fn refresh(&self, request: RefreshRequest) -> AppResult<AccessTokenResponse> {
        let access = self.accounts.refresh(&request.refresh)?;
        info!("🔄 Access token renovado");
        Ok(AccessTokenResponse::new(access))
    }

    pub async fn register(
        &self,
        request: RegisterAccountRequest,
        actor: Option<&AuthenticatedUser>,
    ) -> AppResult<RegisteredAccountResponse> {
        let cliente = request.cliente;
        let usuario_id = request.usuario_id;
        let account = self.accounts.register(request, actor).await?;

        Ok(RegisteredAccountResponse {
            account: AccountResponse::from(account),
            cliente,
            usuario_id,
        })
    }
}
