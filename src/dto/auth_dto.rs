use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::account::AccountResponse;
use crate::models::person::{PersonKind, PersonRef};

// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Response de login: par de tokens, con alias para clientes que esperan *_token
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPairResponse {
    pub fn new(access: String, refresh: String) -> Self {
        Self {
            access_token: access.clone(),
            refresh_token: refresh.clone(),
            access,
            refresh,
        }
    }
}

// Request de refresh
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(alias = "refresh_token")]
    pub refresh: String,
}

// Response de refresh
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
    pub access_token: String,
}

impl AccessTokenResponse {
    pub fn new(access: String) -> Self {
        Self {
            access_token: access.clone(),
            access,
        }
    }
}

// Request para registrar una cuenta vinculada a un cliente o funcionario
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAccountRequest {
    #[validate(
        length(min = 1, max = 150),
        regex(path = "crate::utils::validation::USERNAME_REGEX", message = "Username inválido.")
    )]
    pub username: String,
    pub password: String,
    #[validate(email(message = "Informe um endereço de email válido."))]
    pub email: String,
    pub cliente: bool,
    pub usuario_id: i64,
}

impl RegisterAccountRequest {
    pub fn person(&self) -> PersonRef {
        PersonRef {
            kind: PersonKind::from_is_customer(self.cliente),
            id: self.usuario_id,
        }
    }
}

// Response de registro: cuenta creada y persona vinculada
#[derive(Debug, Serialize)]
pub struct RegisteredAccountResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub cliente: bool,
    pub usuario_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_accepts_both_names() {
        let a: RefreshRequest = serde_json::from_str(r#"{"refresh": "x"}"#).unwrap();
        let b: RefreshRequest = serde_json::from_str(r#"{"refresh_token": "y"}"#).unwrap();
        assert_eq!(a.refresh, "x");
        assert_eq!(b.refresh, "y");
    }

    #[test]
    fn test_register_request_validation() {
        let request: RegisterAccountRequest = serde_json::from_str(
            r#"{"username": "ana silva", "password": "x", "email": "not-an-email", "cliente": true, "usuario_id": 1}"#,
        )
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("username"));
        assert_eq!(request.person().kind, PersonKind::Customer);
    }

    #[test]
    fn test_token_pair_aliases() {
        let json = serde_json::to_value(TokenPairResponse::new("a".into(), "r".into())).unwrap();
        assert_eq!(json["access"], json["access_token"]);
        assert_eq!(json["refresh"], json["refresh_token"]);
    }
}
