//! Modelos de localización
//!
//! Jerarquía estricta UF -> cidade -> bairro -> endereço. Los datos de
//! referencia se crean bajo demanda y se identifican por su clave natural.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// UF - mapea a la tabla states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct State {
    pub id: i64,
    #[serde(rename = "sigla")]
    pub abbreviation: String,
}

/// Cidade - única por (name, state_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "uf")]
    pub state_id: i64,
}

/// Bairro - único por (name, city_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Neighborhood {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cidade")]
    pub city_id: i64,
}

/// Endereço - mapea a la tabla addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub id: i64,
    pub postal_code: String,
    pub street: String,
    pub number: i32,
    pub complement: String,
    pub neighborhood_id: i64,
}

/// Clave natural de un endereço (todos los campos salvo el id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub postal_code: String,
    pub street: String,
    pub number: i32,
    pub complement: String,
    pub neighborhood_id: i64,
}

impl NewAddress {
    pub fn matches(&self, address: &Address) -> bool {
        address.postal_code == self.postal_code
            && address.number == self.number
            && address.neighborhood_id == self.neighborhood_id
            && address.street == self.street
            && address.complement == self.complement
    }
}

/// Fila plana de endereço con toda su jerarquía resuelta (JOIN)
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AddressHierarchy {
    pub id: i64,
    pub postal_code: String,
    pub street: String,
    pub number: i32,
    pub complement: String,
    pub neighborhood_id: i64,
    pub neighborhood_name: String,
    pub city_id: i64,
    pub city_name: String,
    pub state_id: i64,
    pub state_abbreviation: String,
}

impl AddressHierarchy {
    pub fn from_parts(address: &Address, neighborhood: &Neighborhood, city: &City, state: &State) -> Self {
        Self {
            id: address.id,
            postal_code: address.postal_code.clone(),
            street: address.street.clone(),
            number: address.number,
            complement: address.complement.clone(),
            neighborhood_id: neighborhood.id,
            neighborhood_name: neighborhood.name.clone(),
            city_id: city.id,
            city_name: city.name.clone(),
            state_id: state.id,
            state_abbreviation: state.abbreviation.clone(),
        }
    }
}
