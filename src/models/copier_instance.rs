//! Modelo de CopiadoraCliente
//!
//! Una copiadora concreta (número de serie único) instalada en un cliente
//! bajo una franquia.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::person::UnknownCode;

/// Tipo de adquisición de la copiadora
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionType {
    #[serde(rename = "alugada")]
    Rented,
    #[serde(rename = "vendida")]
    Sold,
    #[serde(rename = "externo")]
    External,
}

impl AcquisitionType {
    pub fn code(&self) -> &'static str {
        match self {
            AcquisitionType::Rented => "alugada",
            AcquisitionType::Sold => "vendida",
            AcquisitionType::External => "externo",
        }
    }
}

impl TryFrom<String> for AcquisitionType {
    type Error = UnknownCode;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        match code.as_str() {
            "alugada" => Ok(AcquisitionType::Rented),
            "vendida" => Ok(AcquisitionType::Sold),
            "externo" => Ok(AcquisitionType::External),
            _ => Err(UnknownCode { kind: "tipo_aquisicao", code }),
        }
    }
}

/// CopiadoraCliente - mapea a la tabla copier_instances
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CopierInstance {
    pub id: i64,
    pub customer_id: i64,
    pub copier_id: i64,
    pub billing_period_id: i64,
    pub serial_number: String,
    #[sqlx(try_from = "String")]
    pub acquisition_type: AcquisitionType,
    pub maintenance_frequency_months: Option<i32>,
}

/// Campos editables de una CopiadoraCliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopierInstanceValues {
    pub customer_id: i64,
    pub copier_id: i64,
    pub billing_period_id: i64,
    pub serial_number: String,
    pub acquisition_type: AcquisitionType,
    pub maintenance_frequency_months: Option<i32>,
}

impl From<&CopierInstance> for CopierInstanceValues {
    fn from(instance: &CopierInstance) -> Self {
        Self {
            customer_id: instance.customer_id,
            copier_id: instance.copier_id,
            billing_period_id: instance.billing_period_id,
            serial_number: instance.serial_number.clone(),
            acquisition_type: instance.acquisition_type,
            maintenance_frequency_months: instance.maintenance_frequency_months,
        }
    }
}
