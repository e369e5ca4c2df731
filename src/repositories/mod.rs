//! Capa de persistencia
//!
//! Los controllers y servicios dependen de los traits `*Store`; hay dos
//! implementaciones: `PgStore` (PostgreSQL vía sqlx) y `MemoryStore`
//! (en memoria, para desarrollo y tests). Ambas garantizan las claves
//! naturales (UF, cidade, bairro, endereço, username, número de serie,
//! marca) con operaciones atómicas de insert-or-fetch.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::account::{Account, NewAccount};
use crate::models::billing::{BillingPeriod, BillingPeriodValues};
use crate::models::catalog::{Brand, Copier, CopierImage, CopierValues, Feature};
use crate::models::copier_instance::{CopierInstance, CopierInstanceValues};
use crate::models::location::{Address, AddressHierarchy, City, Neighborhood, NewAddress, State};
use crate::models::person::{Customer, CustomerValues, Employee, EmployeeValues, PersonRef};
use crate::utils::errors::AppResult;

pub mod account_repository;
pub mod billing_repository;
pub mod catalog_repository;
pub mod location_repository;
pub mod memory;
pub mod person_repository;

pub use memory::MemoryStore;

/// Datos de referencia y endereços
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Get-or-create por sigla exacta
    async fn get_or_create_state(&self, abbreviation: &str) -> AppResult<State>;
    /// Get-or-create por (nome, uf)
    async fn get_or_create_city(&self, name: &str, state_id: i64) -> AppResult<City>;
    /// Get-or-create por (nome, cidade)
    async fn get_or_create_neighborhood(&self, name: &str, city_id: i64) -> AppResult<Neighborhood>;
    /// Get-or-create por la clave natural completa del endereço
    async fn get_or_create_address(&self, address: &NewAddress) -> AppResult<Address>;

    async fn list_states(&self) -> AppResult<Vec<State>>;
    async fn list_cities(&self) -> AppResult<Vec<City>>;
    async fn list_neighborhoods(&self) -> AppResult<Vec<Neighborhood>>;
    async fn list_addresses(&self) -> AppResult<Vec<AddressHierarchy>>;
    async fn find_address(&self, id: i64) -> AppResult<Option<AddressHierarchy>>;
    /// Elimina el endereço; las personas que lo referencian quedan sin endereço
    async fn delete_address(&self, id: i64) -> AppResult<bool>;
}

/// Clientes y funcionarios
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn list_customers(&self) -> AppResult<Vec<Customer>>;
    async fn find_customer(&self, id: i64) -> AppResult<Option<Customer>>;
    async fn find_customer_by_account(&self, account_id: i64) -> AppResult<Option<Customer>>;
    async fn create_customer(&self, values: &CustomerValues) -> AppResult<Customer>;
    async fn update_customer(&self, id: i64, values: &CustomerValues) -> AppResult<Option<Customer>>;
    async fn delete_customer(&self, id: i64) -> AppResult<bool>;

    async fn list_employees(&self) -> AppResult<Vec<Employee>>;
    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>>;
    async fn find_employee_by_account(&self, account_id: i64) -> AppResult<Option<Employee>>;
    async fn create_employee(&self, values: &EmployeeValues) -> AppResult<Employee>;
    async fn update_employee(&self, id: i64, values: &EmployeeValues) -> AppResult<Option<Employee>>;
    async fn delete_employee(&self, id: i64) -> AppResult<bool>;

    /// Vincula un endereço existente a la persona. `false` si la persona no existe.
    async fn set_person_address(&self, person: PersonRef, address_id: i64) -> AppResult<bool>;
}

/// Cuentas de acceso
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_account(&self, account: &NewAccount) -> AppResult<Account>;
    /// Crea la cuenta y la vincula a la persona en una sola operación
    async fn create_linked_account(&self, account: &NewAccount, person: PersonRef) -> AppResult<Account>;
    async fn find_account(&self, id: i64) -> AppResult<Option<Account>>;
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>>;
}

/// Catálogo: marcas, funcionalidades y copiadoras
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_brands(&self) -> AppResult<Vec<Brand>>;
    async fn find_brand(&self, id: i64) -> AppResult<Option<Brand>>;
    async fn create_brand(&self, name: &str) -> AppResult<Brand>;
    async fn update_brand(&self, id: i64, name: &str) -> AppResult<Option<Brand>>;
    async fn delete_brand(&self, id: i64) -> AppResult<bool>;

    async fn list_features(&self) -> AppResult<Vec<Feature>>;
    async fn find_feature(&self, id: i64) -> AppResult<Option<Feature>>;
    async fn create_feature(&self, name: &str) -> AppResult<Feature>;
    async fn update_feature(&self, id: i64, name: &str) -> AppResult<Option<Feature>>;
    async fn delete_feature(&self, id: i64) -> AppResult<bool>;

    async fn list_copiers(&self) -> AppResult<Vec<Copier>>;
    async fn find_copier(&self, id: i64) -> AppResult<Option<Copier>>;
    async fn create_copier(&self, values: &CopierValues) -> AppResult<Copier>;
    async fn update_copier(&self, id: i64, values: &CopierValues) -> AppResult<Option<Copier>>;
    async fn delete_copier(&self, id: i64) -> AppResult<bool>;
    async fn copier_features(&self, copier_id: i64) -> AppResult<Vec<Feature>>;
    async fn copier_images(&self, copier_id: i64) -> AppResult<Vec<CopierImage>>;
}

/// Franquias y copiadoras de clientes
#[async_trait]
pub trait BillingStore: Send + Sync {
    async fn list_billing_periods(&self) -> AppResult<Vec<BillingPeriod>>;
    async fn find_billing_period(&self, id: i64) -> AppResult<Option<BillingPeriod>>;
    async fn create_billing_period(&self, values: &BillingPeriodValues) -> AppResult<BillingPeriod>;
    async fn update_billing_period(&self, id: i64, values: &BillingPeriodValues) -> AppResult<Option<BillingPeriod>>;
    async fn delete_billing_period(&self, id: i64) -> AppResult<bool>;

    async fn list_copier_instances(&self) -> AppResult<Vec<CopierInstance>>;
    async fn find_copier_instance(&self, id: i64) -> AppResult<Option<CopierInstance>>;
    async fn create_copier_instance(&self, values: &CopierInstanceValues) -> AppResult<CopierInstance>;
    async fn update_copier_instance(&self, id: i64, values: &CopierInstanceValues) -> AppResult<Option<CopierInstance>>;
    async fn delete_copier_instance(&self, id: i64) -> AppResult<bool>;
}

/// Store completo usado por el estado de la aplicación
pub trait Store: LocationStore + PersonStore + AccountStore + CatalogStore + BillingStore {}

impl<T> Store for T where T: LocationStore + PersonStore + AccountStore + CatalogStore + BillingStore {}

/// Store respaldado por PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
