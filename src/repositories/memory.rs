//! Store en memoria
//!
//! Reproduce las mismas garantías que el esquema de PostgreSQL (claves
//! naturales, unicidad, claves foráneas y cascadas) sobre tablas en
//! `BTreeMap` protegidas por un único `RwLock`. Cada operación toma el
//! lock una sola vez, así que los get-or-create son atómicos.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AccountStore, BillingStore, CatalogStore, LocationStore, PersonStore};
use crate::models::account::{Account, NewAccount};
use crate::models::billing::{BillingPeriod, BillingPeriodValues};
use crate::models::catalog::{Brand, Copier, CopierImage, CopierValues, Feature};
use crate::models::copier_instance::{CopierInstance, CopierInstanceValues};
use crate::models::location::{Address, AddressHierarchy, City, Neighborhood, NewAddress, State};
use crate::models::person::{Customer, CustomerValues, Employee, EmployeeValues, PersonKind, PersonRef};
use crate::utils::errors::{address_in_use_error, conflict_error, not_found_error, AppError, AppResult};

/// Tabla con ids autoincrementales
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.values().find(|row| predicate(row)).cloned()
    }
}

#[derive(Debug, Default)]
struct Tables {
    states: Table<State>,
    cities: Table<City>,
    neighborhoods: Table<Neighborhood>,
    addresses: Table<Address>,
    accounts: Table<Account>,
    customers: Table<Customer>,
    employees: Table<Employee>,
    brands: Table<Brand>,
    features: Table<Feature>,
    copiers: Table<Copier>,
    copier_features: BTreeSet<(i64, i64)>,
    copier_images: Table<CopierImage>,
    billing_periods: Table<BillingPeriod>,
    copier_instances: Table<CopierInstance>,
}

impl Tables {
    fn hierarchy(&self, address: &Address) -> Option<AddressHierarchy> {
        let neighborhood = self.neighborhoods.rows.get(&address.neighborhood_id)?;
        let city = self.cities.rows.get(&neighborhood.city_id)?;
        let state = self.states.rows.get(&city.state_id)?;
        Some(AddressHierarchy::from_parts(address, neighborhood, city, state))
    }

    fn check_address(&self, address_id: Option<i64>) -> AppResult<()> {
        match address_id {
            Some(id) if !self.addresses.contains(id) => Err(not_found_error("Endereço", id)),
            _ => Ok(()),
        }
    }

    /// Un endereço pertenece como mucho a una persona de cada tipo
    fn check_address_owner(&self, kind: PersonKind, address_id: Option<i64>, person_id: Option<i64>) -> AppResult<()> {
        let Some(address_id) = address_id else {
            return Ok(());
        };
        let owned_by_other = |owner_id: i64, owner_address: Option<i64>| {
            owner_address == Some(address_id) && Some(owner_id) != person_id
        };
        let taken = match kind {
            PersonKind::Customer => self.customers.rows.values().any(|c| owned_by_other(c.id, c.address_id)),
            PersonKind::Employee => self.employees.rows.values().any(|e| owned_by_other(e.id, e.address_id)),
        };
        if taken {
            Err(address_in_use_error(address_id))
        } else {
            Ok(())
        }
    }

    fn check_copier_refs(&self, values: &CopierValues) -> AppResult<()> {
        if !self.brands.contains(values.brand_id) {
            return Err(not_found_error("Marca", values.brand_id));
        }
        if let Some(missing) = values.feature_ids.iter().find(|id| !self.features.contains(**id)) {
            return Err(not_found_error("Funcionalidade", *missing));
        }
        Ok(())
    }

    fn check_instance(&self, values: &CopierInstanceValues, current_id: Option<i64>) -> AppResult<()> {
        let serial_taken = self
            .copier_instances
            .rows
            .values()
            .any(|i| i.serial_number == values.serial_number && Some(i.id) != current_id);
        if serial_taken {
            return Err(conflict_error("CopierInstance", "numero_de_serie", &values.serial_number));
        }
        if !self.customers.contains(values.customer_id) {
            return Err(not_found_error("Cliente", values.customer_id));
        }
        if !self.copiers.contains(values.copier_id) {
            return Err(not_found_error("Copiadora", values.copier_id));
        }
        if !self.billing_periods.contains(values.billing_period_id) {
            return Err(not_found_error("Franquia", values.billing_period_id));
        }
        Ok(())
    }

    fn replace_copier_relations(&mut self, copier_id: i64, values: &CopierValues) {
        self.copier_features.retain(|(c, _)| *c != copier_id);
        for feature_id in values.unique_feature_ids() {
            self.copier_features.insert((copier_id, feature_id));
        }

        self.copier_images.rows.retain(|_, image| image.copier_id != copier_id);
        for image in &values.images {
            self.copier_images.insert_with(|id| CopierImage {
                id,
                copier_id,
                url: image.url.clone(),
                description: image.description.clone(),
            });
        }
    }

    fn remove_copier(&mut self, copier_id: i64) -> bool {
        if self.copiers.rows.remove(&copier_id).is_none() {
            return false;
        }
        self.copier_features.retain(|(c, _)| *c != copier_id);
        self.copier_images.rows.retain(|_, image| image.copier_id != copier_id);
        self.copier_instances.rows.retain(|_, i| i.copier_id != copier_id);
        true
    }
}

fn copier_row(id: i64, values: &CopierValues) -> Copier {
    Copier {
        id,
        model: values.model.clone(),
        manufacturer: values.manufacturer.clone(),
        description: values.description.clone(),
        cartridge: values.cartridge.clone(),
        characteristics: values.characteristics.clone(),
        speed: values.speed.clone(),
        brand_id: values.brand_id,
    }
}

fn instance_row(id: i64, values: &CopierInstanceValues) -> CopierInstance {
    CopierInstance {
        id,
        customer_id: values.customer_id,
        copier_id: values.copier_id,
        billing_period_id: values.billing_period_id,
        serial_number: values.serial_number.clone(),
        acquisition_type: values.acquisition_type,
        maintenance_frequency_months: values.maintenance_frequency_months,
    }
}

fn customer_row(id: i64, account_id: Option<i64>, values: &CustomerValues) -> Customer {
    Customer {
        id,
        account_id,
        name: values.name.clone(),
        phone: values.phone.clone(),
        cnpj: values.cnpj.clone(),
        cpf: values.cpf.clone(),
        how_found: values.how_found,
        address_id: values.address_id,
    }
}

fn employee_row(id: i64, account_id: Option<i64>, values: &EmployeeValues) -> Employee {
    Employee {
        id,
        account_id,
        name: values.name.clone(),
        phone: values.phone.clone(),
        cnpj: values.cnpj.clone(),
        cpf: values.cpf.clone(),
        job_title: values.job_title.clone(),
        department: values.department,
        address_id: values.address_id,
    }
}

/// Store en memoria para desarrollo y tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn get_or_create_state(&self, abbreviation: &str) -> AppResult<State> {
        let mut tables = self.tables.write().await;
        if let Some(state) = tables.states.find(|s| s.abbreviation == abbreviation) {
            return Ok(state);
        }
        Ok(tables.states.insert_with(|id| State {
            id,
            abbreviation: abbreviation.to_string(),
        }))
    }

    async fn get_or_create_city(&self, name: &str, state_id: i64) -> AppResult<City> {
        let mut tables = self.tables.write().await;
        if !tables.states.contains(state_id) {
            return Err(not_found_error("UF", state_id));
        }
        if let Some(city) = tables.cities.find(|c| c.name == name && c.state_id == state_id) {
            return Ok(city);
        }
        Ok(tables.cities.insert_with(|id| City {
            id,
            name: name.to_string(),
            state_id,
        }))
    }

    async fn get_or_create_neighborhood(&self, name: &str, city_id: i64) -> AppResult<Neighborhood> {
        let mut tables = self.tables.write().await;
        if !tables.cities.contains(city_id) {
            return Err(not_found_error("Cidade", city_id));
        }
        if let Some(neighborhood) = tables.neighborhoods.find(|n| n.name == name && n.city_id == city_id) {
            return Ok(neighborhood);
        }
        Ok(tables.neighborhoods.insert_with(|id| Neighborhood {
            id,
            name: name.to_string(),
            city_id,
        }))
    }

    async fn get_or_create_address(&self, address: &NewAddress) -> AppResult<Address> {
        let mut tables = self.tables.write().await;
        if !tables.neighborhoods.contains(address.neighborhood_id) {
            return Err(not_found_error("Bairro", address.neighborhood_id));
        }
        if let Some(existing) = tables.addresses.find(|a| address.matches(a)) {
            return Ok(existing);
        }
        Ok(tables.addresses.insert_with(|id| Address {
            id,
            postal_code: address.postal_code.clone(),
            street: address.street.clone(),
            number: address.number,
            complement: address.complement.clone(),
            neighborhood_id: address.neighborhood_id,
        }))
    }

    async fn list_states(&self) -> AppResult<Vec<State>> {
        Ok(self.tables.read().await.states.all())
    }

    async fn list_cities(&self) -> AppResult<Vec<City>> {
        Ok(self.tables.read().await.cities.all())
    }

    async fn list_neighborhoods(&self) -> AppResult<Vec<Neighborhood>> {
        Ok(self.tables.read().await.neighborhoods.all())
    }

    async fn list_addresses(&self) -> AppResult<Vec<AddressHierarchy>> {
        let tables = self.tables.read().await;
        Ok(tables
            .addresses
            .rows
            .values()
            .filter_map(|address| tables.hierarchy(address))
            .collect())
    }

    async fn find_address(&self, id: i64) -> AppResult<Option<AddressHierarchy>> {
        let tables = self.tables.read().await;
        Ok(tables.addresses.rows.get(&id).and_then(|address| tables.hierarchy(address)))
    }

    async fn delete_address(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.addresses.rows.remove(&id).is_none() {
            return Ok(false);
        }
        for customer in tables.customers.rows.values_mut() {
            if customer.address_id == Some(id) {
                customer.address_id = None;
            }
        }
        for employee in tables.employees.rows.values_mut() {
            if employee.address_id == Some(id) {
                employee.address_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(self.tables.read().await.customers.all())
    }

    async fn find_customer(&self, id: i64) -> AppResult<Option<Customer>> {
        Ok(self.tables.read().await.customers.get(id))
    }

    async fn find_customer_by_account(&self, account_id: i64) -> AppResult<Option<Customer>> {
        Ok(self.tables.read().await.customers.find(|c| c.account_id == Some(account_id)))
    }

    async fn create_customer(&self, values: &CustomerValues) -> AppResult<Customer> {
        let mut tables = self.tables.write().await;
        tables.check_address(values.address_id)?;
        tables.check_address_owner(PersonKind::Customer, values.address_id, None)?;
        Ok(tables.customers.insert_with(|id| customer_row(id, None, values)))
    }

    async fn update_customer(&self, id: i64, values: &CustomerValues) -> AppResult<Option<Customer>> {
        let mut tables = self.tables.write().await;
        let Some(account_id) = tables.customers.rows.get(&id).map(|c| c.account_id) else {
            return Ok(None);
        };
        tables.check_address(values.address_id)?;
        tables.check_address_owner(PersonKind::Customer, values.address_id, Some(id))?;
        let row = customer_row(id, account_id, values);
        tables.customers.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_customer(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.customers.rows.remove(&id).is_none() {
            return Ok(false);
        }
        tables.copier_instances.rows.retain(|_, i| i.customer_id != id);
        Ok(true)
    }

    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(self.tables.read().await.employees.all())
    }

    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>> {
        Ok(self.tables.read().await.employees.get(id))
    }

    async fn find_employee_by_account(&self, account_id: i64) -> AppResult<Option<Employee>> {
        Ok(self.tables.read().await.employees.find(|e| e.account_id == Some(account_id)))
    }

    async fn create_employee(&self, values: &EmployeeValues) -> AppResult<Employee> {
        let mut tables = self.tables.write().await;
        tables.check_address(values.address_id)?;
        tables.check_address_owner(PersonKind::Employee, values.address_id, None)?;
        Ok(tables.employees.insert_with(|id| employee_row(id, None, values)))
    }

    async fn update_employee(&self, id: i64, values: &EmployeeValues) -> AppResult<Option<Employee>> {
        let mut tables = self.tables.write().await;
        let Some(account_id) = tables.employees.rows.get(&id).map(|e| e.account_id) else {
            return Ok(None);
        };
        tables.check_address(values.address_id)?;
        tables.check_address_owner(PersonKind::Employee, values.address_id, Some(id))?;
        let row = employee_row(id, account_id, values);
        tables.employees.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_employee(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.employees.rows.remove(&id).is_some())
    }

    async fn set_person_address(&self, person: PersonRef, address_id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let exists = match person.kind {
            PersonKind::Customer => tables.customers.contains(person.id),
            PersonKind::Employee => tables.employees.contains(person.id),
        };
        if !exists {
            return Ok(false);
        }
        tables.check_address(Some(address_id))?;
        tables.check_address_owner(person.kind, Some(address_id), Some(person.id))?;
        let slot = match person.kind {
            PersonKind::Customer => tables.customers.rows.get_mut(&person.id).map(|c| &mut c.address_id),
            PersonKind::Employee => tables.employees.rows.get_mut(&person.id).map(|e| &mut e.address_id),
        };
        match slot {
            Some(slot) => {
                *slot = Some(address_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, account: &NewAccount) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        insert_account(&mut tables, account)
    }

    async fn create_linked_account(&self, account: &NewAccount, person: PersonRef) -> AppResult<Account> {
        let mut tables = self.tables.write().await;

        let linked = match person.kind {
            PersonKind::Customer => tables.customers.rows.get(&person.id).map(|c| c.account_id),
            PersonKind::Employee => tables.employees.rows.get(&person.id).map(|e| e.account_id),
        };
        match linked {
            None => return Err(not_found_error(person.kind.label(), person.id)),
            Some(Some(_)) => {
                return Err(AppError::Conflict(format!("{} ya tiene una cuenta vinculada", person)));
            }
            Some(None) => {}
        }

        let created = insert_account(&mut tables, account)?;
        match person.kind {
            PersonKind::Customer => {
                if let Some(customer) = tables.customers.rows.get_mut(&person.id) {
                    customer.account_id = Some(created.id);
                }
            }
            PersonKind::Employee => {
                if let Some(employee) = tables.employees.rows.get_mut(&person.id) {
                    employee.account_id = Some(created.id);
                }
            }
        }
        Ok(created)
    }

    async fn find_account(&self, id: i64) -> AppResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(id))
    }

    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.find(|a| a.username == username))
    }
}

fn insert_account(tables: &mut Tables, account: &NewAccount) -> AppResult<Account> {
    if tables.accounts.rows.values().any(|a| a.username == account.username) {
        return Err(conflict_error("Account", "username", &account.username));
    }
    Ok(tables.accounts.insert_with(|id| Account {
        id,
        username: account.username.clone(),
        email: account.email.clone(),
        password_hash: account.password_hash.clone(),
        is_superuser: account.is_superuser,
        created_at: Utc::now(),
    }))
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_brands(&self) -> AppResult<Vec<Brand>> {
        Ok(self.tables.read().await.brands.all())
    }

    async fn find_brand(&self, id: i64) -> AppResult<Option<Brand>> {
        Ok(self.tables.read().await.brands.get(id))
    }

    async fn create_brand(&self, name: &str) -> AppResult<Brand> {
        let mut tables = self.tables.write().await;
        if tables.brands.rows.values().any(|b| b.name == name) {
            return Err(conflict_error("Marca", "nome", name));
        }
        Ok(tables.brands.insert_with(|id| Brand {
            id,
            name: name.to_string(),
        }))
    }

    async fn update_brand(&self, id: i64, name: &str) -> AppResult<Option<Brand>> {
        let mut tables = self.tables.write().await;
        if !tables.brands.contains(id) {
            return Ok(None);
        }
        if tables.brands.rows.values().any(|b| b.name == name && b.id != id) {
            return Err(conflict_error("Marca", "nome", name));
        }
        let brand = Brand {
            id,
            name: name.to_string(),
        };
        tables.brands.rows.insert(id, brand.clone());
        Ok(Some(brand))
    }

    async fn delete_brand(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.brands.rows.remove(&id).is_none() {
            return Ok(false);
        }
        let copier_ids: Vec<i64> = tables
            .copiers
            .rows
            .values()
            .filter(|c| c.brand_id == id)
            .map(|c| c.id)
            .collect();
        for copier_id in copier_ids {
            tables.remove_copier(copier_id);
        }
        Ok(true)
    }

    async fn list_features(&self) -> AppResult<Vec<Feature>> {
        Ok(self.tables.read().await.features.all())
    }

    async fn find_feature(&self, id: i64) -> AppResult<Option<Feature>> {
        Ok(self.tables.read().await.features.get(id))
    }

    async fn create_feature(&self, name: &str) -> AppResult<Feature> {
        let mut tables = self.tables.write().await;
        Ok(tables.features.insert_with(|id| Feature {
            id,
            name: name.to_string(),
        }))
    }

    async fn update_feature(&self, id: i64, name: &str) -> AppResult<Option<Feature>> {
        let mut tables = self.tables.write().await;
        match tables.features.rows.get_mut(&id) {
            Some(feature) => {
                feature.name = name.to_string();
                Ok(Some(feature.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_feature(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.features.rows.remove(&id).is_none() {
            return Ok(false);
        }
        tables.copier_features.retain(|(_, f)| *f != id);
        Ok(true)
    }

    async fn list_copiers(&self) -> AppResult<Vec<Copier>> {
        Ok(self.tables.read().await.copiers.all())
    }

    async fn find_copier(&self, id: i64) -> AppResult<Option<Copier>> {
        Ok(self.tables.read().await.copiers.get(id))
    }

    async fn create_copier(&self, values: &CopierValues) -> AppResult<Copier> {
        let mut tables = self.tables.write().await;
        tables.check_copier_refs(values)?;
        let copier = tables.copiers.insert_with(|id| copier_row(id, values));
        tables.replace_copier_relations(copier.id, values);
        Ok(copier)
    }

    async fn update_copier(&self, id: i64, values: &CopierValues) -> AppResult<Option<Copier>> {
        let mut tables = self.tables.write().await;
        if !tables.copiers.contains(id) {
            return Ok(None);
        }
        tables.check_copier_refs(values)?;
        let copier = copier_row(id, values);
        tables.copiers.rows.insert(id, copier.clone());
        tables.replace_copier_relations(id, values);
        Ok(Some(copier))
    }

    async fn delete_copier(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.remove_copier(id))
    }

    async fn copier_features(&self, copier_id: i64) -> AppResult<Vec<Feature>> {
        let tables = self.tables.read().await;
        Ok(tables
            .copier_features
            .iter()
            .filter(|(c, _)| *c == copier_id)
            .filter_map(|(_, f)| tables.features.get(*f))
            .collect())
    }

    async fn copier_images(&self, copier_id: i64) -> AppResult<Vec<CopierImage>> {
        let tables = self.tables.read().await;
        Ok(tables
            .copier_images
            .rows
            .values()
            .filter(|image| image.copier_id == copier_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BillingStore for MemoryStore {
    async fn list_billing_periods(&self) -> AppResult<Vec<BillingPeriod>> {
        Ok(self.tables.read().await.billing_periods.all())
    }

    async fn find_billing_period(&self, id: i64) -> AppResult<Option<BillingPeriod>> {
        Ok(self.tables.read().await.billing_periods.get(id))
    }

    async fn create_billing_period(&self, values: &BillingPeriodValues) -> AppResult<BillingPeriod> {
        let mut tables = self.tables.write().await;
        Ok(tables.billing_periods.insert_with(|id| values.clone().into_row(id)))
    }

    async fn update_billing_period(&self, id: i64, values: &BillingPeriodValues) -> AppResult<Option<BillingPeriod>> {
        let mut tables = self.tables.write().await;
        if !tables.billing_periods.contains(id) {
            return Ok(None);
        }
        let row = values.clone().into_row(id);
        tables.billing_periods.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_billing_period(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.billing_periods.rows.remove(&id).is_none() {
            return Ok(false);
        }
        tables.copier_instances.rows.retain(|_, i| i.billing_period_id != id);
        Ok(true)
    }

    async fn list_copier_instances(&self) -> AppResult<Vec<CopierInstance>> {
        Ok(self.tables.read().await.copier_instances.all())
    }

    async fn find_copier_instance(&self, id: i64) -> AppResult<Option<CopierInstance>> {
        Ok(self.tables.read().await.copier_instances.get(id))
    }

    async fn create_copier_instance(&self, values: &CopierInstanceValues) -> AppResult<CopierInstance> {
        let mut tables = self.tables.write().await;
        tables.check_instance(values, None)?;
        Ok(tables.copier_instances.insert_with(|id| instance_row(id, values)))
    }

    async fn update_copier_instance(
        &self,
        id: i64,
        values: &CopierInstanceValues,
    ) -> AppResult<Option<CopierInstance>> {
        let mut tables = self.tables.write().await;
        if !tables.copier_instances.contains(id) {
            return Ok(None);
        }
        tables.check_instance(values, Some(id))?;
        let row = instance_row(id, values);
        tables.copier_instances.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_copier_instance(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.copier_instances.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::NewCopierImage;
    use crate::models::copier_instance::AcquisitionType;
    use crate::models::person::HowFound;

    fn customer_values(address_id: Option<i64>) -> CustomerValues {
        CustomerValues {
            name: Some("Gráfica Paulista".to_string()),
            phone: None,
            cnpj: Some("12.345.678/0001-90".to_string()),
            cpf: None,
            how_found: HowFound::Google,
            address_id,
        }
    }

    fn copier_values(brand_id: i64, feature_ids: Vec<i64>) -> CopierValues {
        CopierValues {
            model: "IM 430".to_string(),
            manufacturer: "Ricoh".to_string(),
            description: String::new(),
            cartridge: String::new(),
            characteristics: String::new(),
            speed: "45 ppm".to_string(),
            brand_id,
            feature_ids,
            images: vec![NewCopierImage {
                url: "https://cdn.example.com/im430.png".to_string(),
                description: None,
            }],
        }
    }

    async fn seed_address(store: &MemoryStore) -> Address {
        let state = store.get_or_create_state("SP").await.unwrap();
        let city = store.get_or_create_city("Campinas", state.id).await.unwrap();
        let neighborhood = store.get_or_create_neighborhood("Centro", city.id).await.unwrap();
        store
            .get_or_create_address(&NewAddress {
                postal_code: "13010-000".to_string(),
                street: "Rua A".to_string(),
                number: 10,
                complement: String::new(),
                neighborhood_id: neighborhood.id,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = MemoryStore::new();
        let first = seed_address(&store).await;
        let second = seed_address(&store).await;

        assert_eq!(first.id, second.id);
        assert_eq!(store.list_states().await.unwrap().len(), 1);
        assert_eq!(store.list_cities().await.unwrap().len(), 1);
        assert_eq!(store.list_neighborhoods().await.unwrap().len(), 1);
        assert_eq!(store.list_addresses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_city_name_in_other_state_is_distinct() {
        let store = MemoryStore::new();
        let sp = store.get_or_create_state("SP").await.unwrap();
        let mg = store.get_or_create_state("MG").await.unwrap();
        let a = store.get_or_create_city("Santa Rita", sp.id).await.unwrap();
        let b = store.get_or_create_city("Santa Rita", mg.id).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_city_requires_existing_state() {
        let store = MemoryStore::new();
        let result = store.get_or_create_city("Campinas", 99).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_address_clears_person_reference() {
        let store = MemoryStore::new();
        let address = seed_address(&store).await;
        let customer = store.create_customer(&customer_values(Some(address.id))).await.unwrap();

        assert!(store.delete_address(address.id).await.unwrap());
        let customer = store.find_customer(customer.id).await.unwrap().unwrap();
        assert_eq!(customer.address_id, None);
    }

    #[tokio::test]
    async fn test_linked_account_only_once() {
        let store = MemoryStore::new();
        let customer = store.create_customer(&customer_values(None)).await.unwrap();
        let person = PersonRef {
            kind: PersonKind::Customer,
            id: customer.id,
        };
        let account = NewAccount {
            username: "grafica".to_string(),
            email: "contato@grafica.com.br".to_string(),
            password_hash: "hash".to_string(),
            is_superuser: false,
        };

        let created = store.create_linked_account(&account, person).await.unwrap();
        let linked = store.find_customer_by_account(created.id).await.unwrap().unwrap();
        assert_eq!(linked.id, customer.id);

        let again = NewAccount {
            username: "grafica2".to_string(),
            ..account
        };
        let result = store.create_linked_account(&again, person).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(store.find_account_by_username("grafica2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_brand_delete_cascades_to_copiers_and_instances() {
        let store = MemoryStore::new();
        let brand = store.create_brand("Ricoh").await.unwrap();
        let feature = store.create_feature("Scanner").await.unwrap();
        let copier = store.create_copier(&copier_values(brand.id, vec![feature.id])).await.unwrap();
        let customer = store.create_customer(&customer_values(None)).await.unwrap();
        let period = store
            .create_billing_period(&BillingPeriodValues::new(12, "A4".into(), false, Some(100), None).unwrap())
            .await
            .unwrap();
        store
            .create_copier_instance(&CopierInstanceValues {
                customer_id: customer.id,
                copier_id: copier.id,
                billing_period_id: period.id,
                serial_number: "SN-1".to_string(),
                acquisition_type: AcquisitionType::Rented,
                maintenance_frequency_months: Some(3),
            })
            .await
            .unwrap();

        assert_eq!(store.copier_images(copier.id).await.unwrap().len(), 1);
        assert!(store.delete_brand(brand.id).await.unwrap());
        assert!(store.list_copiers().await.unwrap().is_empty());
        assert!(store.list_copier_instances().await.unwrap().is_empty());
        assert!(store.copier_images(copier.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_copier_with_unknown_feature_is_rejected() {
        let store = MemoryStore::new();
        let brand = store.create_brand("Canon").await.unwrap();
        let result = store.create_copier(&copier_values(brand.id, vec![42])).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.list_copiers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_brand_name_conflicts() {
        let store = MemoryStore::new();
        store.create_brand("Xerox").await.unwrap();
        assert!(matches!(store.create_brand("Xerox").await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_address_belongs_to_one_customer() {
        let store = MemoryStore::new();
        let address = seed_address(&store).await;
        let owner = store.create_customer(&customer_values(Some(address.id))).await.unwrap();

        let second = store.create_customer(&customer_values(Some(address.id))).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));

        let other = store.create_customer(&customer_values(None)).await.unwrap();
        let relink = PersonRef {
            kind: PersonKind::Customer,
            id: other.id,
        };
        let result = store.set_person_address(relink, address.id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.find_customer(other.id).await.unwrap().unwrap().address_id, None);

        let result = store.update_customer(other.id, &customer_values(Some(address.id))).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // el dueño puede volver a guardar su propio endereço
        assert!(store.update_customer(owner.id, &customer_values(Some(address.id))).await.unwrap().is_some());
        let owner_ref = PersonRef {
            kind: PersonKind::Customer,
            id: owner.id,
        };
        assert!(store.set_person_address(owner_ref, address.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_address_is_free_again_after_owner_is_deleted() {
        let store = MemoryStore::new();
        let address = seed_address(&store).await;
        let owner = store.create_customer(&customer_values(Some(address.id))).await.unwrap();

        assert!(store.delete_customer(owner.id).await.unwrap());
        assert!(store.create_customer(&customer_values(Some(address.id))).await.is_ok());
    }
}
