//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas por los DTOs (`#[validate(custom = ...)]`) y los servicios.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// CEP brasileño: 01000-000 o 01000000
    pub static ref POSTAL_CODE_REGEX: Regex = Regex::new(r"^\d{5}-?\d{3}$").unwrap();
    /// Sigla de UF: dos letras mayúsculas
    pub static ref STATE_CODE_REGEX: Regex = Regex::new(r"^[A-Z]{2}$").unwrap();
    /// Username: letras, dígitos y @/./+/-/_
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[\w.@+-]+$").unwrap();
}

/// Máximo para preco_unidade (NUMERIC(8, 2))
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);
/// Máximo para valor (NUMERIC(10, 2))
pub const MAX_TOTAL_VALUE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Largo mínimo de contraseña
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un monto tenga como máximo dos decimales y no sea negativo
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }

    if value.normalize().scale() > 2 {
        let mut error = ValidationError::new("decimal_places");
        error.add_param("max".into(), &2);
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar precio unitario: monto válido dentro de NUMERIC(8, 2)
pub fn validate_unit_price(value: &Decimal) -> Result<(), ValidationError> {
    validate_money(value)?;
    if *value > MAX_UNIT_PRICE {
        let mut error = ValidationError::new("max_digits");
        error.add_param("max".into(), &MAX_UNIT_PRICE.to_string());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Reglas de contraseña:
/// largo mínimo, no solo dígitos y distinta del username.
pub fn validate_password_strength(password: &str, username: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        let mut error = ValidationError::new("password_too_short");
        error.add_param("min".into(), &MIN_PASSWORD_LENGTH);
        error.message = Some("Esta contraseña es demasiado corta.".into());
        return Err(error);
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        let mut error = ValidationError::new("password_entirely_numeric");
        error.message = Some("Esta contraseña es completamente numérica.".into());
        return Err(error);
    }

    if password.eq_ignore_ascii_case(username) {
        let mut error = ValidationError::new("password_too_similar");
        error.message = Some("La contraseña es demasiado similar al username.".into());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_postal_code_regex() {
        assert!(POSTAL_CODE_REGEX.is_match("01000-000"));
        assert!(POSTAL_CODE_REGEX.is_match("01000000"));
        assert!(!POSTAL_CODE_REGEX.is_match("0100-000"));
        assert!(!POSTAL_CODE_REGEX.is_match("abcde-fgh"));
    }

    #[test]
    fn test_state_code_regex() {
        assert!(STATE_CODE_REGEX.is_match("SP"));
        assert!(!STATE_CODE_REGEX.is_match("sp"));
        assert!(!STATE_CODE_REGEX.is_match("SPA"));
    }

    #[test]
    fn test_username_regex() {
        assert!(USERNAME_REGEX.is_match("maria.silva@intersul"));
        assert!(!USERNAME_REGEX.is_match("maria silva"));
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Centro").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money(&Decimal::from_str("0.50").unwrap()).is_ok());
        assert!(validate_money(&Decimal::from_str("10.500").unwrap()).is_ok());
        assert!(validate_money(&Decimal::from_str("0.505").unwrap()).is_err());
        assert!(validate_money(&Decimal::from_str("-1").unwrap()).is_err());
    }

    #[test]
    fn test_validate_unit_price_bounds() {
        assert!(validate_unit_price(&Decimal::from_str("999999.99").unwrap()).is_ok());
        assert!(validate_unit_price(&Decimal::from_str("1000000.00").unwrap()).is_err());
        assert_eq!(MAX_TOTAL_VALUE, Decimal::from_str("99999999.99").unwrap());
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("copias-2024", "maria").is_ok());
        assert!(validate_password_strength("short", "maria").is_err());
        assert!(validate_password_strength("12345678901", "maria").is_err());
        assert!(validate_password_strength("MariaSilva", "mariasilva").is_err());
    }
}
