//! Modelos del catálogo de copiadoras
//!
//! Marcas, funcionalidades, copiadoras (modelo de catálogo) e imágenes.

use serde::Serialize;
use sqlx::FromRow;

/// Marca - nombre único
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Brand {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

/// Funcionalidade (ej: "Scanner", "Duplex")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Feature {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

/// Copiadora de catálogo - mapea a la tabla copiers
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Copier {
    pub id: i64,
    pub model: String,
    pub manufacturer: String,
    pub description: String,
    pub cartridge: String,
    pub characteristics: String,
    pub speed: String,
    pub brand_id: i64,
}

/// Imagen asociada a una copiadora
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CopierImage {
    pub id: i64,
    #[serde(skip)]
    pub copier_id: i64,
    #[serde(rename = "imagem")]
    pub url: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}

/// Imagen a crear junto con la copiadora
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCopierImage {
    pub url: String,
    pub description: Option<String>,
}

/// Campos editables de una copiadora, incluyendo relaciones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopierValues {
    pub model: String,
    pub manufacturer: String,
    pub description: String,
    pub cartridge: String,
    pub characteristics: String,
    pub speed: String,
    pub brand_id: i64,
    pub feature_ids: Vec<i64>,
    pub images: Vec<NewCopierImage>,
}

impl CopierValues {
    /// Valores actuales de una copiadora guardada
    pub fn from_parts(copier: &Copier, features: &[Feature], images: &[CopierImage]) -> Self {
        Self {
            model: copier.model.clone(),
            manufacturer: copier.manufacturer.clone(),
            description: copier.description.clone(),
            cartridge: copier.cartridge.clone(),
            characteristics: copier.characteristics.clone(),
            speed: copier.speed.clone(),
            brand_id: copier.brand_id,
            feature_ids: features.iter().map(|f| f.id).collect(),
            images: images
                .iter()
                .map(|image| NewCopierImage {
                    url: image.url.clone(),
                    description: image.description.clone(),
                })
                .collect(),
        }
    }

    /// Ids de funcionalidades sin duplicados, en orden de aparición
    pub fn unique_feature_ids(&self) -> Vec<i64> {
        let mut ids = Vec::with_capacity(self.feature_ids.len());
        for id in &self.feature_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_feature_ids_keeps_order() {
        let values = CopierValues {
            model: "MFC-L2750".into(),
            manufacturer: "Brother".into(),
            description: String::new(),
            cartridge: String::new(),
            characteristics: String::new(),
            speed: String::new(),
            brand_id: 1,
            feature_ids: vec![3, 1, 3, 2, 1],
            images: vec![],
        };
        assert_eq!(values.unique_feature_ids(), vec![3, 1, 2]);
    }
}
