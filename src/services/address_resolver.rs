//! Resolver de endereços
//!
//! Convierte UF, cidade, bairro y los datos de la calle en texto libre en
//! un endereço normalizado. Cada nivel es un get-or-create por clave
//! natural exacta (sin normalizar mayúsculas ni espacios) y cada paso usa
//! el id devuelto por el anterior. Todas las entradas se validan antes de
//! la primera escritura.

use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::models::location::{Address, AddressHierarchy, NewAddress};
use crate::models::person::{PersonKind, PersonRef};
use crate::repositories::{LocationStore, PersonStore};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_not_empty;

/// Datos de entrada del resolver (nombres del contrato JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AddressQuery {
    #[serde(rename = "uf")]
    #[validate(regex(path = "crate::utils::validation::STATE_CODE_REGEX", message = "UF inválida."))]
    pub state_code: String,
    #[serde(rename = "cidade")]
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub city_name: String,
    #[serde(rename = "bairro")]
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub neighborhood_name: String,
    #[serde(rename = "logradouro")]
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub street: String,
    #[serde(rename = "numero")]
    #[validate(range(min = 0))]
    pub number: i32,
    #[serde(rename = "complemento", default)]
    #[validate(length(max = 100))]
    pub complement: String,
    #[serde(rename = "cep")]
    #[validate(regex(path = "crate::utils::validation::POSTAL_CODE_REGEX", message = "CEP inválido."))]
    pub postal_code: String,
}

/// Resuelve (o crea) la jerarquía UF -> cidade -> bairro -> endereço
pub async fn resolve_address<S>(store: &S, query: &AddressQuery) -> AppResult<Address>
where
    S: LocationStore + ?Sized,
{
    query.validate()?;

    let state = store.get_or_create_state(&query.state_code).await?;
    let city = store.get_or_create_city(&query.city_name, state.id).await?;
    let neighborhood = store.get_or_create_neighborhood(&query.neighborhood_name, city.id).await?;
    let address = store
        .get_or_create_address(&NewAddress {
            postal_code: query.postal_code.clone(),
            street: query.street.clone(),
            number: query.number,
            complement: query.complement.clone(),
            neighborhood_id: neighborhood.id,
        })
        .await?;

    debug!(
        "📍 Endereço resuelto: uf={} cidade={} bairro={} endereco={}",
        state.id, city.id, neighborhood.id, address.id
    );

    Ok(address)
}

async fn person_exists<S>(store: &S, person: PersonRef) -> AppResult<bool>
where
    S: PersonStore + ?Sized,
{
    Ok(match person.kind {
        PersonKind::Customer => store.find_customer(person.id).await?.is_some(),
        PersonKind::Employee => store.find_employee(person.id).await?.is_some(),
    })
}

/// Valida, verifica la persona, resuelve el endereço y lo vincula a la persona
pub async fn register_location<S>(store: &S, person: PersonRef, query: &AddressQuery) -> AppResult<AddressHierarchy>
where
    S: LocationStore + PersonStore + ?Sized,
{
    query.validate()?;

    if !person_exists(store, person).await? {
        return Err(not_found_error(person.kind.label(), person.id));
    }

    let address = resolve_address(store, query).await?;

    if !store.set_person_address(person, address.id).await? {
        return Err(not_found_error(person.kind.label(), person.id));
    }

    info!("📍 Endereço {} vinculado a {}", address.id, person);

    store
        .find_address(address.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Endereço {} desapareció tras resolverlo", address.id)))
}
