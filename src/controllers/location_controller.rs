use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::dto::location_dto::{
    AddressDetail, CityDetail, NeighborhoodDetail, RegisterLocationRequest, RegisteredLocationResponse,
};
use crate::models::location::State;
use crate::repositories::Store;
use crate::services::address_resolver;
use crate::utils::errors::{not_found_error, AppResult};

pub struct LocationController {
    store: Arc<dyn Store>,
}

impl LocationController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resuelve el endereço enviado y lo vincula a la persona indicada
    pub async fn register_location(&self, request: RegisterLocationRequest) -> AppResult<RegisteredLocationResponse> {
        let person = request.person();
        let hierarchy = address_resolver::register_location(self.store.as_ref(), person, &request.address).await?;

        Ok(RegisteredLocationResponse {
            cliente: request.cliente,
            usuario_id: request.usuario_id,
            endereco: AddressDetail::from(hierarchy),
        })
    }

    pub async fn list_states(&self) -> AppResult<Vec<State>> {
        self.store.list_states().await
    }

    async fn cities_by_id(&self) -> AppResult<HashMap<i64, CityDetail>> {
        let states: HashMap<i64, State> = self
            .store
            .list_states()
            .await?
            .into_iter()
            .map(|state| (state.id, state))
            .collect();

        Ok(self
            .store
            .list_cities()
            .await?
            .iter()
            .filter_map(|city| {
                states
                    .get(&city.state_id)
                    .map(|state| (city.id, CityDetail::new(city, state)))
            })
            .collect())
    }

    pub async fn list_cities(&self) -> AppResult<Vec<CityDetail>> {
        let mut cities: Vec<CityDetail> = self.cities_by_id().await?.into_values().collect();
        cities.sort_by_key(|city| city.id);
        Ok(cities)
    }

    pub async fn list_neighborhoods(&self) -> AppResult<Vec<NeighborhoodDetail>> {
        let cities = self.cities_by_id().await?;

        Ok(self
            .store
            .list_neighborhoods()
            .await?
            .iter()
            .filter_map(|neighborhood| {
                cities
                    .get(&neighborhood.city_id)
                    .map(|city| NeighborhoodDetail::new(neighborhood, city.clone()))
            })
            .collect())
    }

    pub async fn list_addresses(&self) -> AppResult<Vec<AddressDetail>> {
        Ok(self
            .store
            .list_addresses()
            .await?
            .into_iter()
            .map(AddressDetail::from)
            .collect())
    }

    pub async fn get_address(&self, id: i64) -> AppResult<AddressDetail> {
        self.store
            .find_address(id)
            .await?
            .map(AddressDetail::from)
            .ok_or_else(|| not_found_error("Endereço", id))
    }

    /// Las personas que lo referencian quedan sin endereço
    pub async fn delete_address(&self, id: i64) -> AppResult<()> {
        if !self.store.delete_address(id).await? {
            return Err(not_found_error("Endereço", id));
        }
        info!("🗑️ Endereço {} eliminado", id);
        Ok(())
    }
}
