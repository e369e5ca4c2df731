//! InterSul back-office
//!
//! API REST de clientes, funcionarios, endereços, catálogo de copiadoras,
//! franquias y copiadoras instaladas en clientes.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
