//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, variables de entorno
//! y la configuración estática del sitio de administración.

pub mod database;
pub mod environment;
pub mod site;

pub use database::DatabaseConfig;
pub use environment::*;
pub use site::{AdminSiteConfig, ADMIN_SITE};
