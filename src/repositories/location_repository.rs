use async_trait::async_trait;

use super::{LocationStore, PgStore};
use crate::models::location::{Address, AddressHierarchy, City, Neighborhood, NewAddress, State};
use crate::utils::errors::{is_foreign_key_violation, AppError, AppResult};

const ADDRESS_HIERARCHY_SELECT: &str = r#"
    SELECT a.id, a.postal_code, a.street, a.number, a.complement, a.neighborhood_id,
           n.name AS neighborhood_name,
           c.id AS city_id, c.name AS city_name,
           s.id AS state_id, s.abbreviation AS state_abbreviation
    FROM addresses a
    JOIN neighborhoods n ON n.id = a.neighborhood_id
    JOIN cities c ON c.id = n.city_id
    JOIN states s ON s.id = c.state_id
"#;

fn missing_parent(e: sqlx::Error, parent: &str, id: i64) -> AppError {
    if is_foreign_key_violation(&e) {
        AppError::NotFound(format!("{} with id '{}' not found", parent, id))
    } else {
        AppError::Database(e)
    }
}

// Todos los get-or-create usan INSERT .. ON CONFLICT .. DO UPDATE (no-op)
// para que RETURNING devuelva la fila existente en caso de conflicto.
#[async_trait]
impl LocationStore for PgStore {
    async fn get_or_create_state(&self, abbreviation: &str) -> AppResult<State> {
        let state = sqlx::query_as::<_, State>(
            r#"
            INSERT INTO states (abbreviation)
            VALUES ($1)
            ON CONFLICT ON CONSTRAINT states_natural_key
            DO UPDATE SET abbreviation = EXCLUDED.abbreviation
            RETURNING id, abbreviation
            "#,
        )
        .bind(abbreviation)
        .fetch_one(&self.pool)
        .await?;

        Ok(state)
    }

    async fn get_or_create_city(&self, name: &str, state_id: i64) -> AppResult<City> {
        sqlx::query_as::<_, City>(
            r#"
            INSERT INTO cities (name, state_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT cities_natural_key
            DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, state_id
            "#,
        )
        .bind(name)
        .bind(state_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_parent(e, "UF", state_id))
    }

    async fn get_or_create_neighborhood(&self, name: &str, city_id: i64) -> AppResult<Neighborhood> {
        sqlx::query_as::<_, Neighborhood>(
            r#"
            INSERT INTO neighborhoods (name, city_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT neighborhoods_natural_key
            DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, city_id
            "#,
        )
        .bind(name)
        .bind(city_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_parent(e, "Cidade", city_id))
    }

    async fn get_or_create_address(&self, address: &NewAddress) -> AppResult<Address> {
        sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (postal_code, street, number, complement, neighborhood_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT ON CONSTRAINT addresses_natural_key
            DO UPDATE SET street = EXCLUDED.street
            RETURNING id, postal_code, street, number, complement, neighborhood_id
            "#,
        )
        .bind(&address.postal_code)
        .bind(&address.street)
        .bind(address.number)
        .bind(&address.complement)
        .bind(address.neighborhood_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_parent(e, "Bairro", address.neighborhood_id))
    }

    async fn list_states(&self) -> AppResult<Vec<State>> {
        let states = sqlx::query_as::<_, State>("SELECT id, abbreviation FROM states ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(states)
    }

    async fn list_cities(&self) -> AppResult<Vec<City>> {
        let cities = sqlx::query_as::<_, City>("SELECT id, name, state_id FROM cities ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(cities)
    }

    async fn list_neighborhoods(&self) -> AppResult<Vec<Neighborhood>> {
        let neighborhoods =
            sqlx::query_as::<_, Neighborhood>("SELECT id, name, city_id FROM neighborhoods ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(neighborhoods)
    }

    async fn list_addresses(&self) -> AppResult<Vec<AddressHierarchy>> {
        let query = format!("{} ORDER BY a.id", ADDRESS_HIERARCHY_SELECT);
        let addresses = sqlx::query_as::<_, AddressHierarchy>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(addresses)
    }

    async fn find_address(&self, id: i64) -> AppResult<Option<AddressHierarchy>> {
        let query = format!("{} WHERE a.id = $1", ADDRESS_HIERARCHY_SELECT);
        let address = sqlx::query_as::<_, AddressHierarchy>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(address)
    }

    async fn delete_address(&self, id: i64) -> AppResult<bool> {
        // customers/employees.address_id son ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
