//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean
//! al schema PostgreSQL (ver `migrations/`).

pub mod account;
pub mod billing;
pub mod catalog;
pub mod copier_instance;
pub mod location;
pub mod person;
