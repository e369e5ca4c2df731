//! Política de autorización
//!
//! El resto de las colecciones solo exige un token válido (`require_auth`).
//! Gestionar funcionarios y crear cuentas de funcionario queda reservado a
//! superusuarios y a funcionarios de los setores autorizados.

use crate::middleware::auth::AuthenticatedUser;
use crate::models::person::Department;
use crate::utils::errors::{forbidden_error, AppError, AppResult};

/// Setores que pueden gestionar funcionarios
pub const AUTHORIZED_DEPARTMENTS: &[Department] = &[Department::Administrative];

/// Acciones sujetas a política
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Crear, actualizar o eliminar funcionarios
    ManageEmployees,
    /// Crear una cuenta vinculada a un funcionario
    RegisterEmployeeAccount,
}

impl Action {
    fn describe(&self) -> &'static str {
        match self {
            Action::ManageEmployees => "manage employees",
            Action::RegisterEmployeeAccount => "register employee accounts",
        }
    }
}

/// Decisión pura sobre un actor autenticado
pub fn is_permitted(actor: &AuthenticatedUser, action: Action) -> bool {
    match action {
        Action::ManageEmployees | Action::RegisterEmployeeAccount => {
            actor.is_superuser
                || actor
                    .department
                    .map_or(false, |department| AUTHORIZED_DEPARTMENTS.contains(&department))
        }
    }
}

/// Sin actor -> 401; actor sin permiso -> 403
pub fn authorize(actor: Option<&AuthenticatedUser>, action: Action) -> AppResult<()> {
    let Some(actor) = actor else {
        return Err(AppError::Unauthorized("Autenticação requerida".to_string()));
    };

    if is_permitted(actor, action) {
        Ok(())
    } else {
        Err(forbidden_error(
            action.describe(),
            &format!("account '{}' is not allowed", actor.username),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(is_superuser: bool, department: Option<Department>) -> AuthenticatedUser {
        AuthenticatedUser {
            account_id: 1,
            username: "ana".to_string(),
            is_superuser,
            department,
        }
    }

    #[test]
    fn test_employee_management_rules() {
        assert!(is_permitted(&actor(true, None), Action::ManageEmployees));
        assert!(is_permitted(&actor(false, Some(Department::Administrative)), Action::ManageEmployees));
        assert!(!is_permitted(&actor(false, Some(Department::Technical)), Action::ManageEmployees));
        assert!(!is_permitted(&actor(false, None), Action::RegisterEmployeeAccount));
    }

    #[test]
    fn test_authorize_status() {
        assert!(matches!(
            authorize(None, Action::RegisterEmployeeAccount),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            authorize(Some(&actor(false, Some(Department::Commercial))), Action::RegisterEmployeeAccount),
            Err(AppError::Forbidden(_))
        ));
        assert!(authorize(Some(&actor(false, Some(Department::Administrative))), Action::RegisterEmployeeAccount).is_ok());
    }
}
