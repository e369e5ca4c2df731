//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};

/// Backend de persistencia seleccionado con STORAGE_BACKEND
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("STORAGE_BACKEND desconocido: '{}'", other)),
        }
    }
}

/// Superusuario a crear en el arranque si no existe
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub storage_backend: StorageBackend,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: i64,
    pub jwt_refresh_ttl_seconds: i64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub admin: Option<AdminBootstrap>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8000,
            host: "0.0.0.0".to_string(),
            storage_backend: StorageBackend::Memory,
            jwt_secret: "dev-secret-change-me".to_string(),
            jwt_access_ttl_seconds: 5 * 60,
            jwt_refresh_ttl_seconds: 24 * 60 * 60,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_origins: Vec::new(),
            admin: None,
        }
    }
}

/// Lee una variable opcional y la parsea, usando `default` si no está definida
fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} inválido ('{}'): {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Construye la configuración desde variables de entorno (.env ya cargado)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let is_production = environment == "production";

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if is_production => bail!("JWT_SECRET must be set in production"),
            _ => defaults.jwt_secret,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::Postgres,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(AdminBootstrap {
                username,
                password,
                email: env::var("ADMIN_EMAIL").unwrap_or_default(),
            }),
            (Ok(_), Err(_)) => bail!("ADMIN_PASSWORD must be set when ADMIN_USERNAME is set"),
            _ => None,
        };

        let config = Self {
            environment,
            port: parse_or("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            storage_backend,
            jwt_secret,
            jwt_access_ttl_seconds: parse_or("JWT_ACCESS_TTL_SECONDS", defaults.jwt_access_ttl_seconds)?,
            jwt_refresh_ttl_seconds: parse_or("JWT_REFRESH_TTL_SECONDS", defaults.jwt_refresh_ttl_seconds)?,
            bcrypt_cost: parse_or("BCRYPT_COST", defaults.bcrypt_cost)?,
            cors_origins,
            admin,
        };

        if config.jwt_access_ttl_seconds <= 0 || config.jwt_refresh_ttl_seconds <= 0 {
            bail!("JWT TTLs must be positive");
        }
        if !(4..=31).contains(&config.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }

        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!(" Postgres ".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_default_is_development() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:8000");
    }
}
