//! Modelos de Cliente y Funcionario
//!
//! Ambos comparten la misma forma base (nome, telefone, CPF/CNPJ, conta
//! opcional, endereço opcional) y difieren en sus campos de negocio.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Código desconocido leído desde la base de datos
#[derive(Debug, Error)]
#[error("código desconocido para {kind}: '{code}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

/// Cómo conoció la empresa (como_conheceu)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HowFound {
    #[serde(rename = "RS")]
    SocialMedia,
    #[serde(rename = "G")]
    Google,
    #[serde(rename = "I")]
    Referral,
    #[default]
    #[serde(rename = "O")]
    Other,
}

impl HowFound {
    pub fn code(&self) -> &'static str {
        match self {
            HowFound::SocialMedia => "RS",
            HowFound::Google => "G",
            HowFound::Referral => "I",
            HowFound::Other => "O",
        }
    }
}

impl TryFrom<String> for HowFound {
    type Error = UnknownCode;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        match code.as_str() {
            "RS" => Ok(HowFound::SocialMedia),
            "G" => Ok(HowFound::Google),
            "I" => Ok(HowFound::Referral),
            "O" => Ok(HowFound::Other),
            _ => Err(UnknownCode { kind: "como_conheceu", code }),
        }
    }
}

/// Setor del funcionario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Department {
    #[default]
    #[serde(rename = "A")]
    Administrative,
    #[serde(rename = "T")]
    Technical,
    #[serde(rename = "C")]
    Commercial,
}

impl Department {
    pub fn code(&self) -> &'static str {
        match self {
            Department::Administrative => "A",
            Department::Technical => "T",
            Department::Commercial => "C",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Department::Administrative => "Administrativo",
            Department::Technical => "Técnico",
            Department::Commercial => "Comercial",
        }
    }
}

impl TryFrom<String> for Department {
    type Error = UnknownCode;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        match code.as_str() {
            "A" => Ok(Department::Administrative),
            "T" => Ok(Department::Technical),
            "C" => Ok(Department::Commercial),
            _ => Err(UnknownCode { kind: "setor", code }),
        }
    }
}

/// Tipo de persona (cliente o funcionario)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonKind {
    Customer,
    Employee,
}

impl PersonKind {
    pub fn from_is_customer(is_customer: bool) -> Self {
        if is_customer {
            PersonKind::Customer
        } else {
            PersonKind::Employee
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            PersonKind::Customer => "customers",
            PersonKind::Employee => "employees",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersonKind::Customer => "Cliente",
            PersonKind::Employee => "Funcionario",
        }
    }
}

/// Referencia a una persona concreta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonRef {
    pub kind: PersonKind,
    pub id: i64,
}

impl fmt::Display for PersonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind.label(), self.id)
    }
}

/// Cliente - mapea a la tabla customers
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Customer {
    pub id: i64,
    pub account_id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub cnpj: Option<String>,
    pub cpf: Option<String>,
    #[sqlx(try_from = "String")]
    pub how_found: HowFound,
    pub address_id: Option<i64>,
}

/// Campos editables de un cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerValues {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub cnpj: Option<String>,
    pub cpf: Option<String>,
    pub how_found: HowFound,
    pub address_id: Option<i64>,
}

impl From<&Customer> for CustomerValues {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            cnpj: customer.cnpj.clone(),
            cpf: customer.cpf.clone(),
            how_found: customer.how_found,
            address_id: customer.address_id,
        }
    }
}

/// Funcionario - mapea a la tabla employees
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Employee {
    pub id: i64,
    pub account_id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub cnpj: Option<String>,
    pub cpf: Option<String>,
    pub job_title: Option<String>,
    #[sqlx(try_from = "String")]
    pub department: Department,
    pub address_id: Option<i64>,
}

impl Employee {
    /// Equivalente a "{nome} - {setor} {cargo}"
    pub fn display(&self) -> String {
        format!(
            "{} - {} {}",
            self.name.as_deref().unwrap_or_default(),
            self.department.code(),
            self.job_title.as_deref().unwrap_or_default()
        )
    }
}

/// Campos editables de un funcionario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeValues {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub cnpj: Option<String>,
    pub cpf: Option<String>,
    pub job_title: Option<String>,
    pub department: Department,
    pub address_id: Option<i64>,
}

impl From<&Employee> for EmployeeValues {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            phone: employee.phone.clone(),
            cnpj: employee.cnpj.clone(),
            cpf: employee.cpf.clone(),
            job_title: employee.job_title.clone(),
            department: employee.department,
            address_id: employee.address_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_db_representation() {
        for how in [HowFound::SocialMedia, HowFound::Google, HowFound::Referral, HowFound::Other] {
            assert_eq!(HowFound::try_from(how.code().to_string()).unwrap(), how);
        }
        for dep in [Department::Administrative, Department::Technical, Department::Commercial] {
            assert_eq!(Department::try_from(dep.code().to_string()).unwrap(), dep);
        }
        assert!(Department::try_from("X".to_string()).is_err());
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        assert_eq!(serde_json::to_string(&HowFound::SocialMedia).unwrap(), "\"RS\"");
        let dep: Department = serde_json::from_str("\"T\"").unwrap();
        assert_eq!(dep, Department::Technical);
    }

    #[test]
    fn test_employee_display() {
        let employee = Employee {
            id: 1,
            account_id: None,
            name: Some("Ana".to_string()),
            phone: None,
            cnpj: None,
            cpf: Some("123".to_string()),
            job_title: Some("Gerente".to_string()),
            department: Department::Administrative,
            address_id: None,
        };
        assert_eq!(employee.display(), "Ana - A Gerente");
    }
}
