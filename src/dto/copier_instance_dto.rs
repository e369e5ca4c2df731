use serde::{Deserialize, Serialize};
use validator::Validate;

use super::catalog_dto::CopierDetail;
use super::{merge_nullable, nullable, FieldMerge, REQUIRED_MESSAGE};
use crate::models::billing::BillingPeriod;
use crate::models::copier_instance::{AcquisitionType, CopierInstance, CopierInstanceValues};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_not_empty;

// Request para crear/actualizar una copiadora de cliente (ids planos)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CopierInstanceWriteRequest {
    pub cliente: Option<i64>,
    pub copiadora: Option<i64>,
    pub franquia: Option<i64>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub numero_de_serie: Option<String>,
    pub tipo_aquisicao: Option<AcquisitionType>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0))]
    pub frequencia_manutencao: Option<Option<i32>>,
}

impl CopierInstanceWriteRequest {
    pub fn into_values(self, current: Option<&CopierInstance>) -> AppResult<CopierInstanceValues> {
        let mut merge = FieldMerge::default();
        let customer_id = merge.required("cliente", self.cliente, current.map(|c| c.customer_id));
        let copier_id = merge.required("copiadora", self.copiadora, current.map(|c| c.copier_id));
        let billing_period_id = merge.required("franquia", self.franquia, current.map(|c| c.billing_period_id));
        let serial_number = merge.required(
            "numero_de_serie",
            self.numero_de_serie,
            current.map(|c| c.serial_number.clone()),
        );
        let acquisition_type = self.tipo_aquisicao.or(current.map(|c| c.acquisition_type));
        if acquisition_type.is_none() {
            merge.missing("tipo_aquisicao");
        }
        merge.finish()?;

        let acquisition_type = acquisition_type.ok_or_else(|| validation_error("tipo_aquisicao", REQUIRED_MESSAGE))?;

        Ok(CopierInstanceValues {
            customer_id,
            copier_id,
            billing_period_id,
            serial_number,
            acquisition_type,
            maintenance_frequency_months: merge_nullable(
                self.frequencia_manutencao,
                current.and_then(|c| c.maintenance_frequency_months),
            ),
        })
    }
}

// Response de copiadora de cliente con copiadora y franquia anidadas
#[derive(Debug, Serialize)]
pub struct CopierInstanceDetail {
    pub id: i64,
    pub cliente: i64,
    pub copiadora: CopierDetail,
    pub franquia: BillingPeriod,
    pub numero_de_serie: String,
    pub tipo_aquisicao: AcquisitionType,
    pub frequencia_manutencao: Option<i32>,
}

impl CopierInstanceDetail {
    pub fn new(instance: CopierInstance, copiadora: CopierDetail, franquia: BillingPeriod) -> Self {
        Self {
            id: instance.id,
            cliente: instance.customer_id,
            copiadora,
            franquia,
            numero_de_serie: instance.serial_number,
            tipo_aquisicao: instance.acquisition_type,
            frequencia_manutencao: instance.maintenance_frequency_months,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_requires_all_references() {
        let request: CopierInstanceWriteRequest =
            serde_json::from_str(r#"{"numero_de_serie": "SN-1"}"#).unwrap();
        match request.into_values(None) {
            Err(crate::utils::errors::AppError::Validation(errors)) => {
                let fields = errors.field_errors();
                for field in ["cliente", "copiadora", "franquia", "tipo_aquisicao"] {
                    assert!(fields.contains_key(field), "missing error for {}", field);
                }
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_instance_rejects_unknown_acquisition_type() {
        let result: Result<CopierInstanceWriteRequest, _> =
            serde_json::from_str(r#"{"tipo_aquisicao": "leasing"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_instance_patch_clears_frequency() {
        let current = CopierInstance {
            id: 1,
            customer_id: 1,
            copier_id: 2,
            billing_period_id: 3,
            serial_number: "SN-1".into(),
            acquisition_type: AcquisitionType::Sold,
            maintenance_frequency_months: Some(6),
        };
        let request: CopierInstanceWriteRequest =
            serde_json::from_str(r#"{"frequencia_manutencao": null}"#).unwrap();
        let values = request.into_values(Some(&current)).unwrap();
        assert_eq!(values.maintenance_frequency_months, None);
        assert_eq!(values.acquisition_type, AcquisitionType::Sold);
    }
}
