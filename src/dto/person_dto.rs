use serde::{Deserialize, Serialize};
use validator::Validate;

use super::location_dto::AddressDetail;
use super::{merge_nullable, nullable, FieldMerge};
use crate::models::account::AccountResponse;
use crate::models::person::{Customer, CustomerValues, Department, Employee, EmployeeValues, HowFound};
use crate::utils::errors::AppResult;

const TAX_ID_MESSAGE: &str = "Informe CPF ou CNPJ.";

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// CPF o CNPJ obligatorio (al menos uno, no vacío)
fn check_tax_id(merge: &mut FieldMerge, cpf: &Option<String>, cnpj: &Option<String>) {
    if is_blank(cpf) && is_blank(cnpj) {
        merge.invalid("cpf", TAX_ID_MESSAGE);
        merge.invalid("cnpj", TAX_ID_MESSAGE);
    }
}

// Request para crear/actualizar un cliente. `usuario` es de solo lectura.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CustomerWriteRequest {
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 112))]
    pub nome: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 25))]
    pub telefone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 25))]
    pub cnpj: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 25))]
    pub cpf: Option<Option<String>>,
    pub como_conheceu: Option<HowFound>,
    #[serde(default, deserialize_with = "nullable")]
    pub endereco: Option<Option<i64>>,
}

impl CustomerWriteRequest {
    /// Combina con el cliente actual (PATCH) o con los valores por defecto
    pub fn into_values(self, current: Option<&Customer>) -> AppResult<CustomerValues> {
        let base = current.map(CustomerValues::from);
        let values = CustomerValues {
            name: merge_nullable(self.nome, base.as_ref().and_then(|b| b.name.clone())),
            phone: merge_nullable(self.telefone, base.as_ref().and_then(|b| b.phone.clone())),
            cnpj: merge_nullable(self.cnpj, base.as_ref().and_then(|b| b.cnpj.clone())),
            cpf: merge_nullable(self.cpf, base.as_ref().and_then(|b| b.cpf.clone())),
            how_found: self
                .como_conheceu
                .or(base.as_ref().map(|b| b.how_found))
                .unwrap_or_default(),
            address_id: merge_nullable(self.endereco, base.as_ref().and_then(|b| b.address_id)),
        };

        let mut merge = FieldMerge::default();
        check_tax_id(&mut merge, &values.cpf, &values.cnpj);
        merge.finish()?;

        Ok(values)
    }
}

// Request para crear/actualizar un funcionario
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EmployeeWriteRequest {
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 112))]
    pub nome: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 25))]
    pub telefone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 25))]
    pub cnpj: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 25))]
    pub cpf: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 50))]
    pub cargo: Option<Option<String>>,
    pub setor: Option<Department>,
    #[serde(default, deserialize_with = "nullable")]
    pub endereco: Option<Option<i64>>,
}

impl EmployeeWriteRequest {
    pub fn into_values(self, current: Option<&Employee>) -> AppResult<EmployeeValues> {
        let base = current.map(EmployeeValues::from);
        let values = EmployeeValues {
            name: merge_nullable(self.nome, base.as_ref().and_then(|b| b.name.clone())),
            phone: merge_nullable(self.telefone, base.as_ref().and_then(|b| b.phone.clone())),
            cnpj: merge_nullable(self.cnpj, base.as_ref().and_then(|b| b.cnpj.clone())),
            cpf: merge_nullable(self.cpf, base.as_ref().and_then(|b| b.cpf.clone())),
            job_title: merge_nullable(self.cargo, base.as_ref().and_then(|b| b.job_title.clone())),
            department: self
                .setor
                .or(base.as_ref().map(|b| b.department))
                .unwrap_or_default(),
            address_id: merge_nullable(self.endereco, base.as_ref().and_then(|b| b.address_id)),
        };

        let mut merge = FieldMerge::default();
        check_tax_id(&mut merge, &values.cpf, &values.cnpj);
        merge.finish()?;

        Ok(values)
    }
}

// Response de cliente (forma anidada)
#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    pub id: i64,
    pub nome: Option<String>,
    pub cnpj: Option<String>,
    pub telefone: Option<String>,
    pub cpf: Option<String>,
    pub endereco: Option<AddressDetail>,
    pub usuario: Option<AccountResponse>,
    pub como_conheceu: HowFound,
}

impl CustomerDetail {
    pub fn new(customer: Customer, endereco: Option<AddressDetail>, usuario: Option<AccountResponse>) -> Self {
        Self {
            id: customer.id,
            nome: customer.name,
            cnpj: customer.cnpj,
            telefone: customer.phone,
            cpf: customer.cpf,
            endereco,
            usuario,
            como_conheceu: customer.how_found,
        }
    }
}

// Response de funcionario (forma anidada)
#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    pub id: i64,
    pub nome: Option<String>,
    pub cnpj: Option<String>,
    pub telefone: Option<String>,
    pub cpf: Option<String>,
    pub endereco: Option<AddressDetail>,
    pub usuario: Option<AccountResponse>,
    pub cargo: Option<String>,
    pub setor: Department,
}

impl EmployeeDetail {
    pub fn new(employee: Employee, endereco: Option<AddressDetail>, usuario: Option<AccountResponse>) -> Self {
        Self {
            id: employee.id,
            nome: employee.name,
            cnpj: employee.cnpj,
            telefone: employee.phone,
            cpf: employee.cpf,
            endereco,
            usuario,
            cargo: employee.job_title,
            setor: employee.department,
        }
    }
}
