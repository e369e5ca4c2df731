//! Controllers de la API
//!
//! Cada controller recibe el store compartido y arma las respuestas
//! anidadas a partir de los modelos.

pub mod auth_controller;
pub mod billing_controller;
pub mod catalog_controller;
pub mod location_controller;
pub mod person_controller;
