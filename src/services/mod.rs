//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el resolver
//! de endereços, las cuentas y tokens, y la política de autorización.

pub mod account_service;
pub mod address_resolver;
pub mod jwt_service;
pub mod policy;

pub use account_service::AccountService;
pub use jwt_service::{JwtService, TokenPair, TokenType};
