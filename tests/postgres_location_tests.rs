//! Tests contra PostgreSQL real
//!
//! Solo corren si DATABASE_URL está definida; en otro caso terminan sin
//! hacer nada. Cada test usa nombres únicos para no chocar con datos previos.

use std::collections::BTreeSet;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use intersul_backoffice::database::run_migrations;
use intersul_backoffice::models::person::{CustomerValues, HowFound, PersonKind, PersonRef};
use intersul_backoffice::repositories::{LocationStore, PersonStore, PgStore};
use intersul_backoffice::services::address_resolver::{register_location, resolve_address, AddressQuery};
use intersul_backoffice::utils::errors::AppError;

async fn pg_store() -> Option<Arc<PgStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL no definida, test omitido");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&url)
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    Some(Arc::new(PgStore::new(pool)))
}

fn unique_query() -> AddressQuery {
    let tag = Uuid::new_v4().simple().to_string();
    AddressQuery {
        state_code: "SP".to_string(),
        city_name: format!("Cidade {}", tag),
        neighborhood_name: format!("Bairro {}", tag),
        street: format!("Rua {}", tag),
        number: 42,
        complement: String::new(),
        postal_code: "13010-000".to_string(),
    }
}

fn customer_values(name: &str) -> CustomerValues {
    CustomerValues {
        name: Some(name.to_string()),
        phone: None,
        cnpj: Some("12.345.678/0001-90".to_string()),
        cpf: None,
        how_found: HowFound::Other,
        address_id: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_creates_one_row_per_level() {
    let Some(store) = pg_store().await else {
        return;
    };
    let query = unique_query();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let store = store.clone();
            let query = query.clone();
            tokio::spawn(async move { resolve_address(store.as_ref(), &query).await })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap().id);
    }
    assert_eq!(ids.len(), 1);

    let states = store.list_states().await.unwrap();
    assert_eq!(states.iter().filter(|s| s.abbreviation == "SP").count(), 1);

    let cities: Vec<_> = store
        .list_cities()
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.name == query.city_name)
        .collect();
    assert_eq!(cities.len(), 1);

    let neighborhoods = store.list_neighborhoods().await.unwrap();
    assert_eq!(
        neighborhoods
            .iter()
            .filter(|n| n.name == query.neighborhood_name && n.city_id == cities[0].id)
            .count(),
        1
    );

    let addresses = store.list_addresses().await.unwrap();
    assert_eq!(addresses.iter().filter(|a| a.street == query.street).count(), 1);
}

#[tokio::test]
async fn test_address_cannot_be_shared_between_customers() {
    let Some(store) = pg_store().await else {
        return;
    };
    let query = unique_query();
    let maria = store.create_customer(&customer_values("Maria")).await.unwrap();
    let joana = store.create_customer(&customer_values("Joana")).await.unwrap();

    let linked = register_location(
        store.as_ref(),
        PersonRef {
            kind: PersonKind::Customer,
            id: maria.id,
        },
        &query,
    )
    .await
    .unwrap();

    let result = register_location(
        store.as_ref(),
        PersonRef {
            kind: PersonKind::Customer,
            id: joana.id,
        },
        &query,
    )
    .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let joana = store.find_customer(joana.id).await.unwrap().unwrap();
    assert_eq!(joana.address_id, None);

    let second = store
        .create_customer(&CustomerValues {
            address_id: Some(linked.id),
            ..customer_values("Outra")
        })
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    store.delete_customer(maria.id).await.unwrap();
    store.delete_customer(joana.id).await.unwrap();
}
