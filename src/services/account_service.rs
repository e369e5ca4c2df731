//! Servicio de cuentas: login, registro vinculado y superusuario inicial

use std::sync::Arc;

use bcrypt::{hash, verify};
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::config::AdminBootstrap;
use crate::dto::auth_dto::{LoginRequest, RegisterAccountRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::account::{Account, NewAccount};
use crate::models::person::PersonKind;
use crate::repositories::Store;
use crate::services::jwt_service::{JwtService, TokenPair, TokenType};
use crate::services::policy::{self, Action};
use crate::utils::errors::{conflict_error, AppError, AppResult};
use crate::utils::validation::validate_password_strength;

pub struct AccountService {
    store: Arc<dyn Store>,
    jwt: JwtService,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtService, bcrypt_cost: u32) -> Self {
        Self {
            store,
            jwt,
            bcrypt_cost,
        }
    }

    /// Nombre embebido en el token: cliente, luego funcionario, luego username
    pub async fn display_name(&self, account: &Account) -> AppResult<String> {
        let non_blank = |name: Option<String>| name.filter(|n| !n.trim().is_empty());

        if let Some(customer) = self.store.find_customer_by_account(account.id).await? {
            if let Some(name) = non_blank(customer.name) {
                return Ok(name);
            }
        }
        if let Some(employee) = self.store.find_employee_by_account(account.id).await? {
            if let Some(name) = non_blank(employee.name) {
                return Ok(name);
            }
        }
        Ok(account.username.clone())
    }

    /// Verifica credenciales y emite el par de tokens
    pub async fn login(&self, request: LoginRequest) -> AppResult<TokenPair> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Credenciais inválidas".to_string());

        let Some(account) = self.store.find_account_by_username(&request.username).await? else {
            warn!("🔒 Login fallido: usuario '{}' no existe", request.username);
            return Err(invalid());
        };

        if !verify(&request.password, &account.password_hash)? {
            warn!("🔒 Login fallido: contraseña incorrecta para '{}'", request.username);
            return Err(invalid());
        }

        let display_name = self.display_name(&account).await?;
        info!("🔑 Login exitoso: {} ({})", account.username, display_name);

        self.jwt.issue_pair(&account, &display_name)
    }

    pub fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        self.jwt.refresh_access_token(refresh_token)
    }

    /// Crea una cuenta y la vincula a un cliente o funcionario existente
    pub async fn register(
        &self,
        request: RegisterAccountRequest,
        actor: Option<&AuthenticatedUser>,
    ) -> AppResult<Account> {
        let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Err(error) = validate_password_strength(&request.password, &request.username) {
            errors.add("password", error);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let person = request.person();
        if person.kind == PersonKind::Employee {
            policy::authorize(actor, Action::RegisterEmployeeAccount)?;
        }

        if self.store.find_account_by_username(&request.username).await?.is_some() {
            return Err(conflict_error("Account", "username", &request.username));
        }

        let new_account = NewAccount {
            username: request.username,
            email: request.email,
            password_hash: hash(&request.password, self.bcrypt_cost)?,
            is_superuser: false,
        };

        let account = self.store.create_linked_account(&new_account, person).await?;
        info!("👤 Cuenta '{}' creada y vinculada a {}", account.username, person);

        Ok(account)
    }

    /// Crea el superusuario configurado si todavía no existe
    pub async fn bootstrap_superuser(&self, admin: &AdminBootstrap) -> AppResult<bool> {
        if self.store.find_account_by_username(&admin.username).await?.is_some() {
            return Ok(false);
        }

        let account = self
            .store
            .create_account(&NewAccount {
                username: admin.username.clone(),
                email: admin.email.clone(),
                password_hash: hash(&admin.password, self.bcrypt_cost)?,
                is_superuser: true,
            })
            .await?;

        info!("👑 Superusuario '{}' creado", account.username);
        Ok(true)
    }

    /// Resuelve el actor de un access token; la cuenta debe seguir existiendo
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.jwt.verify(token, TokenType::Access)?;
        let account = self
            .store
            .find_account(claims.account_id()?)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Usuário não encontrado".to_string()))?;

        let department = self
            .store
            .find_employee_by_account(account.id)
            .await?
            .map(|employee| employee.department);

        Ok(AuthenticatedUser {
            account_id: account.id,
            username: account.username,
            is_superuser: account.is_superuser,
            department,
        })
    }
}
