use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::models::account::Account;
use crate::utils::errors::{AppError, AppResult};

/// Tipo de token emitido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims de los tokens emitidos en /login/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id de la cuenta
    pub sub: String,
    /// Nombre para mostrar (cliente, funcionario o username)
    pub nome: String,
    pub admin: bool,
    pub token_type: TokenType,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn account_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::Jwt("Token con sujeto inválido".to_string()))
    }
}

/// Par de tokens access/refresh
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Servicio JWT (HS256)
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl JwtService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_token_duration: Duration::seconds(config.jwt_access_ttl_seconds),
            refresh_token_duration: Duration::seconds(config.jwt_refresh_ttl_seconds),
        }
    }

    fn sign(&self, sub: String, nome: String, admin: bool, token_type: TokenType) -> AppResult<String> {
        let now = Utc::now();
        let duration = match token_type {
            TokenType::Access => self.access_token_duration,
            TokenType::Refresh => self.refresh_token_duration,
        };

        let claims = Claims {
            sub,
            nome,
            admin,
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + duration).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))
    }

    /// Genera el par access/refresh para una cuenta
    pub fn issue_pair(&self, account: &Account, display_name: &str) -> AppResult<TokenPair> {
        let sub = account.id.to_string();
        Ok(TokenPair {
            access: self.sign(sub.clone(), display_name.to_string(), account.is_superuser, TokenType::Access)?,
            refresh: self.sign(sub, display_name.to_string(), account.is_superuser, TokenType::Refresh)?,
        })
    }

    /// Valida firma, expiración y tipo del token
    pub fn verify(&self, token: &str, expected: TokenType) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

        if claims.token_type != expected {
            return Err(AppError::Jwt("Tipo de token incorrecto".to_string()));
        }

        Ok(claims)
    }

    /// Emite un nuevo access token a partir de un refresh token válido
    pub fn refresh_access_token(&self, refresh_token: &str) -> AppResult<String> {
        let claims = self.verify(refresh_token, TokenType::Refresh)?;
        self.sign(claims.sub, claims.nome, claims.admin, TokenType::Access)
    }
}
