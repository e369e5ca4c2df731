use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FieldMerge, REQUIRED_MESSAGE};
use crate::models::catalog::{Brand, Copier, CopierImage, CopierValues, Feature, NewCopierImage};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_not_empty;

// Request para marcas y funcionalidades (solo nome)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NamedWriteRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub nome: Option<String>,
}

impl NamedWriteRequest {
    pub fn into_name(self, current: Option<&str>) -> AppResult<String> {
        self.nome
            .or(current.map(str::to_string))
            .ok_or_else(|| validation_error("nome", REQUIRED_MESSAGE))
    }
}

// Imagen enviada junto con la copiadora
#[derive(Debug, Deserialize)]
pub struct CopierImageRequest {
    pub imagem: String,
    pub descricao: Option<String>,
}

impl CopierImageRequest {
    fn is_valid(&self) -> bool {
        !self.imagem.trim().is_empty()
            && self.imagem.chars().count() <= 500
            && self.descricao.as_ref().map_or(true, |d| d.chars().count() <= 255)
    }
}

// Request para crear/actualizar una copiadora (ids planos)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CopierWriteRequest {
    #[validate(length(min = 1, max = 100))]
    pub modelo: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub fabricante: Option<String>,
    pub descricao: Option<String>,
    #[validate(length(max = 100))]
    pub cartucho: Option<String>,
    pub caracteristicas: Option<String>,
    #[validate(length(max = 100))]
    pub velocidade: Option<String>,
    pub marca: Option<i64>,
    pub funcionalidades: Option<Vec<i64>>,
    pub imagens: Option<Vec<CopierImageRequest>>,
}

impl CopierWriteRequest {
    /// Combina con la copiadora actual; funcionalidades e imágenes se reemplazan si llegan
    pub fn into_values(self, current: Option<&CopierValues>) -> AppResult<CopierValues> {
        let mut merge = FieldMerge::default();
        let model = merge.required("modelo", self.modelo, current.map(|c| c.model.clone()));
        let manufacturer = merge.required("fabricante", self.fabricante, current.map(|c| c.manufacturer.clone()));
        let brand_id = merge.required("marca", self.marca, current.map(|c| c.brand_id));
        if let Some(images) = &self.imagens {
            if !images.iter().all(CopierImageRequest::is_valid) {
                merge.invalid("imagens", "Imagem inválida: informe a URL (até 500 caracteres).");
            }
        }
        merge.finish()?;

        let text = |submitted: Option<String>, current: Option<&String>| {
            submitted.or_else(|| current.cloned()).unwrap_or_default()
        };

        Ok(CopierValues {
            model,
            manufacturer,
            description: text(self.descricao, current.map(|c| &c.description)),
            cartridge: text(self.cartucho, current.map(|c| &c.cartridge)),
            characteristics: text(self.caracteristicas, current.map(|c| &c.characteristics)),
            speed: text(self.velocidade, current.map(|c| &c.speed)),
            brand_id,
            feature_ids: self
                .funcionalidades
                .or_else(|| current.map(|c| c.feature_ids.clone()))
                .unwrap_or_default(),
            images: match self.imagens {
                Some(images) => images
                    .into_iter()
                    .map(|image| NewCopierImage {
                        url: image.imagem,
                        description: image.descricao,
                    })
                    .collect(),
                None => current.map(|c| c.images.clone()).unwrap_or_default(),
            },
        })
    }
}

// Response de copiadora con marca, funcionalidades e imágenes
#[derive(Debug, Serialize)]
pub struct CopierDetail {
    pub id: i64,
    pub modelo: String,
    pub fabricante: String,
    pub descricao: String,
    pub cartucho: String,
    pub caracteristicas: String,
    pub velocidade: String,
    pub marca: Option<Brand>,
    pub funcionalidades: Vec<Feature>,
    pub imagens: Vec<CopierImage>,
}

impl CopierDetail {
    pub fn new(copier: Copier, marca: Option<Brand>, funcionalidades: Vec<Feature>, imagens: Vec<CopierImage>) -> Self {
        Self {
            id: copier.id,
            modelo: copier.model,
            fabricante: copier.manufacturer,
            descricao: copier.description,
            cartucho: copier.cartridge,
            caracteristicas: copier.characteristics,
            velocidade: copier.speed,
            marca,
            funcionalidades,
            imagens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copier_create_requires_model_manufacturer_and_brand() {
        let request: CopierWriteRequest = serde_json::from_str(r#"{"descricao": "Laser"}"#).unwrap();
        assert!(request.into_values(None).is_err());
    }

    #[test]
    fn test_copier_patch_keeps_relations() {
        let current = CopierValues {
            model: "IM 430".into(),
            manufacturer: "Ricoh".into(),
            description: "Mono".into(),
            cartridge: "IM 430H".into(),
            characteristics: String::new(),
            speed: "45 ppm".into(),
            brand_id: 1,
            feature_ids: vec![1, 2],
            images: vec![NewCopierImage {
                url: "https://cdn.example.com/a.png".into(),
                description: None,
            }],
        };
        let request: CopierWriteRequest = serde_json::from_str(r#"{"velocidade": "50 ppm"}"#).unwrap();
        let values = request.into_values(Some(&current)).unwrap();

        assert_eq!(values.speed, "50 ppm");
        assert_eq!(values.feature_ids, vec![1, 2]);
        assert_eq!(values.images.len(), 1);
        assert_eq!(values.description, "Mono");
    }

    #[test]
    fn test_copier_rejects_blank_image() {
        let request: CopierWriteRequest = serde_json::from_str(
            r#"{"modelo": "IM 430", "fabricante": "Ricoh", "marca": 1, "imagens": [{"imagem": " "}]}"#,
        )
        .unwrap();
        assert!(request.into_values(None).is_err());
    }

    #[test]
    fn test_named_request() {
        let request: NamedWriteRequest = serde_json::from_str(r#"{"nome": "Duplex"}"#).unwrap();
        assert_eq!(request.into_name(None).unwrap(), "Duplex");
        assert!(NamedWriteRequest::default().into_name(None).is_err());

        let blank = NamedWriteRequest { nome: Some("  ".into()) };
        assert!(blank.validate().is_err());
    }
}
