//! Modelo de cuenta de acceso
//!
//! Una cuenta se vincula como máximo a un cliente o a un funcionario.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Account - mapea a la tabla accounts
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Datos para crear una cuenta (password ya hasheada)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

/// Response de cuenta (sin password)
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            is_superuser: account.is_superuser,
            date_joined: account.created_at,
        }
    }
}
