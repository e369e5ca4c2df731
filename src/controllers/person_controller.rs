//! Controller de clientes y funcionarios
//!
//! Las lecturas devuelven la forma anidada (endereço completo y cuenta);
//! las escrituras reciben ids planos.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::location_dto::AddressDetail;
use crate::dto::person_dto::{CustomerDetail, CustomerWriteRequest, EmployeeDetail, EmployeeWriteRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::account::AccountResponse;
use crate::models::person::{Customer, Employee};
use crate::repositories::Store;
use crate::services::policy::{self, Action};
use crate::utils::errors::{not_found_error, AppResult};

pub struct PersonController {
    store: Arc<dyn Store>,
}

impl PersonController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn address_detail(&self, address_id: Option<i64>) -> AppResult<Option<AddressDetail>> {
        match address_id {
            Some(id) => Ok(self.store.find_address(id).await?.map(AddressDetail::from)),
            None => Ok(None),
        }
    }

    async fn account(&self, account_id: Option<i64>) -> AppResult<Option<AccountResponse>> {
        match account_id {
            Some(id) => Ok(self.store.find_account(id).await?.map(AccountResponse::from)),
            None => Ok(None),
        }
    }

    /// Endereços indexados por id para armar listas sin consultas por fila
    async fn addresses_by_id(&self) -> AppResult<HashMap<i64, AddressDetail>> {
        Ok(self
            .store
            .list_addresses()
            .await?
            .into_iter()
            .map(|row| (row.id, AddressDetail::from(row)))
            .collect())
    }

    async fn customer_detail(&self, customer: Customer) -> AppResult<CustomerDetail> {
        let endereco = self.address_detail(customer.address_id).await?;
        let usuario = self.account(customer.account_id).await?;
        Ok(CustomerDetail::new(customer, endereco, usuario))
    }

    async fn employee_detail(&self, employee: Employee) -> AppResult<EmployeeDetail> {
        let endereco = self.address_detail(employee.address_id).await?;
        let usuario = self.account(employee.account_id).await?;
        Ok(EmployeeDetail::new(employee, endereco, usuario))
    }

    async fn existing_customer(&self, id: i64) -> AppResult<Customer> {
        self.store
            .find_customer(id)
            .await?
            .ok_or_else(|| not_found_error("Cliente", id))
    }

    async fn existing_employee(&self, id: i64) -> AppResult<Employee> {
        self.store
            .find_employee(id)
            .await?
            .ok_or_else(|| not_found_error("Funcionario", id))
    }

    // ----- Clientes -----

    pub async fn list_customers(&self) -> AppResult<Vec<CustomerDetail>> {
        let addresses = self.addresses_by_id().await?;
        let mut details = Vec::new();
        for customer in self.store.list_customers().await? {
            let endereco = customer.address_id.and_then(|id| addresses.get(&id).cloned());
            let usuario = self.account(customer.account_id).await?;
            details.push(CustomerDetail::new(customer, endereco, usuario));
        }
        Ok(details)
    }

    pub async fn get_customer(&self, id: i64) -> AppResult<CustomerDetail> {
        let customer = self.existing_customer(id).await?;
        self.customer_detail(customer).await
    }

    pub async fn create_customer(&self, request: CustomerWriteRequest) -> AppResult<CustomerDetail> {
        request.validate()?;
        let values = request.into_values(None)?;
        let customer = self.store.create_customer(&values).await?;
        info!("👤 Cliente {} creado", customer.id);
        self.customer_detail(customer).await
    }

    /// PUT (`partial = false`) reemplaza; PATCH combina con el cliente actual
    pub async fn update_customer(&self, id: i64, request: CustomerWriteRequest, partial: bool) -> AppResult<CustomerDetail> {
        request.validate()?;
        let current = self.existing_customer(id).await?;
        let values = request.into_values(partial.then_some(&current))?;
        let customer = self
            .store
            .update_customer(id, &values)
            .await?
            .ok_or_else(|| not_found_error("Cliente", id))?;
        self.customer_detail(customer).await
    }

    pub async fn delete_customer(&self, id: i64) -> AppResult<()> {
        if !self.store.delete_customer(id).await? {
            return Err(not_found_error("Cliente", id));
        }
        info!("🗑️ Cliente {} eliminado", id);
        Ok(())
    }

    // ----- Funcionarios -----

    pub async fn list_employees(&self) -> AppResult<Vec<EmployeeDetail>> {
        let addresses = self.addresses_by_id().await?;
        let mut details = Vec::new();
        for employee in self.store.list_employees().await? {
            let endereco = employee.address_id.and_then(|id| addresses.get(&id).cloned());
            let usuario = self.account(employee.account_id).await?;
            details.push(EmployeeDetail::new(employee, endereco, usuario));
        }
        Ok(details)
    }

    pub async fn get_employee(&self, id: i64) -> AppResult<EmployeeDetail> {
        let employee = self.existing_employee(id).await?;
        self.employee_detail(employee).await
    }

    pub async fn create_employee(&self, actor: &AuthenticatedUser, request: EmployeeWriteRequest) -> AppResult<EmployeeDetail> {
        policy::authorize(Some(actor), Action::ManageEmployees)?;
        request.validate()?;
        let values = request.into_values(None)?;
        let employee = self.store.create_employee(&values).await?;
        info!("👷 Funcionario {} creado por '{}'", employee.id, actor.username);
        self.employee_detail(employee).await
    }

    pub async fn update_employee(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        request: EmployeeWriteRequest,
        partial: bool,
    ) -> AppResult<EmployeeDetail> {
        policy::authorize(Some(actor), Action::ManageEmployees)?;
        request.validate()?;
        let current = self.existing_employee(id).await?;
        let values = request.into_values(partial.then_some(&current))?;
        let employee = self
            .store
            .update_employee(id, &values)
            .await?
            .ok_or_else(|| not_found_error("Funcionario", id))?;
        self.employee_detail(employee).await
    }

    pub async fn delete_employee(&self, actor: &AuthenticatedUser, id: i64) -> AppResult<()> {
        policy::authorize(Some(actor), Action::ManageEmployees)?;
        if !self.store.delete_employee(id).await? {
            return Err(not_found_error("Funcionario", id));
        }
        info!("🗑️ Funcionario {} eliminado por '{}'", id, actor.username);
        Ok(())
    }
}
