//! DTOs de la API
//!
//! Los requests de escritura llegan con ids planos y campos opcionales;
//! `into_values` los combina con el registro actual (PATCH) o con los
//! valores por defecto (POST/PUT). Las respuestas usan la forma anidada.

use serde::{Deserialize, Deserializer};
use validator::ValidationErrors;

use crate::utils::errors::{add_field_error, AppError, AppResult};

pub mod auth_dto;
pub mod billing_dto;
pub mod catalog_dto;
pub mod copier_instance_dto;
pub mod location_dto;
pub mod person_dto;

pub const REQUIRED_MESSAGE: &str = "Este campo é obrigatório.";

/// Distingue campo ausente (`None`) de `null` explícito (`Some(None)`).
/// Se usa junto con `#[serde(default)]`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Acumula errores de campos obligatorios al combinar un request con el registro actual
#[derive(Debug, Default)]
pub struct FieldMerge {
    errors: ValidationErrors,
}

impl FieldMerge {
    /// Valor enviado, o el actual; si no hay ninguno registra el error
    pub fn required<T: Default>(&mut self, field: &'static str, submitted: Option<T>, current: Option<T>) -> T {
        match submitted.or(current) {
            Some(value) => value,
            None => {
                self.missing(field);
                T::default()
            }
        }
    }

    pub fn missing(&mut self, field: &'static str) {
        add_field_error(&mut self.errors, field, "required", REQUIRED_MESSAGE);
    }

    pub fn invalid(&mut self, field: &'static str, message: &str) {
        add_field_error(&mut self.errors, field, "invalid", message);
    }

    pub fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Campo anulable: ausente conserva el actual, `null` lo borra
pub fn merge_nullable<T>(submitted: Option<Option<T>>, current: Option<T>) -> Option<T> {
    match submitted {
        Some(value) => value,
        None => current,
    }
}
