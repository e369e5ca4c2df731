//! Configuración estática del sitio de administración

use serde::Serialize;

/// Títulos del panel de administración, servidos en solo lectura
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSiteConfig {
    pub site_header: &'static str,
    pub site_title: &'static str,
    pub index_title: &'static str,
}

pub const ADMIN_SITE: AdminSiteConfig = AdminSiteConfig {
    site_header: "InterSul cópias",
    site_title: "InterSul cópias",
    index_title: "Painel Administrativo",
};
