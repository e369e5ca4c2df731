//! Controller del catálogo: marcas, funcionalidades y copiadoras

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::catalog_dto::{CopierDetail, CopierWriteRequest, NamedWriteRequest};
use crate::models::catalog::{Brand, Copier, CopierValues, Feature};
use crate::repositories::{CatalogStore, Store};
use crate::utils::errors::{not_found_error, AppResult};

/// Arma la copiadora anidada (marca, funcionalidades e imágenes)
pub async fn copier_detail<S>(store: &S, copier: Copier) -> AppResult<CopierDetail>
where
    S: CatalogStore + ?Sized,
{
    let marca = store.find_brand(copier.brand_id).await?;
    let funcionalidades = store.copier_features(copier.id).await?;
    let imagens = store.copier_images(copier.id).await?;
    Ok(CopierDetail::new(copier, marca, funcionalidades, imagens))
}

pub struct CatalogController {
    store: Arc<dyn Store>,
}

impl CatalogController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ----- Marcas -----

    pub async fn list_brands(&self) -> AppResult<Vec<Brand>> {
        self.store.list_brands().await
    }

    pub async fn get_brand(&self, id: i64) -> AppResult<Brand> {
        self.store
            .find_brand(id)
            .await?
            .ok_or_else(|| not_found_error("Marca", id))
    }

    pub async fn create_brand(&self, request: NamedWriteRequest) -> AppResult<Brand> {
        request.validate()?;
        let brand = self.store.create_brand(&request.into_name(None)?).await?;
        info!("🏷️ Marca '{}' creada", brand.name);
        Ok(brand)
    }

    pub async fn update_brand(&self, id: i64, request: NamedWriteRequest, partial: bool) -> AppResult<Brand> {
        request.validate()?;
        let current = self.get_brand(id).await?;
        let name = request.into_name(partial.then_some(current.name.as_str()))?;
        self.store
            .update_brand(id, &name)
            .await?
            .ok_or_else(|| not_found_error("Marca", id))
    }

    /// Elimina también sus copiadoras
    pub async fn delete_brand(&self, id: i64) -> AppResult<()> {
        if !self.store.delete_brand(id).await? {
            return Err(not_found_error("Marca", id));
        }
        info!("🗑️ Marca {} eliminada", id);
        Ok(())
    }

    // ----- Funcionalidades -----

    pub async fn list_features(&self) -> AppResult<Vec<Feature>> {
        self.store.list_features().await
    }

    pub async fn get_feature(&self, id: i64) -> AppResult<Feature> {
        self.store
            .find_feature(id)
            .await?
            .ok_or_else(|| not_found_error("Funcionalidade", id))
    }

    pub async fn create_feature(&self, request: NamedWriteRequest) -> AppResult<Feature> {
        request.validate()?;
        self.store.create_feature(&request.into_name(None)?).await
    }

    pub async fn update_feature(&self, id: i64, request: NamedWriteRequest, partial: bool) -> AppResult<Feature> {
        request.validate()?;
        let current = self.get_feature(id).await?;
        let name = request.into_name(partial.then_some(current.name.as_str()))?;
        self.store
            .update_feature(id, &name)
            .await?
            .ok_or_else(|| not_found_error("Funcionalidade", id))
    }

    pub async fn delete_feature(&self, id: i64) -> AppResult<()> {
        if !self.store.delete_feature(id).await? {
            return Err(not_found_error("Funcionalidade", id));
        }
        Ok(())
    }

    // ----- Copiadoras -----

    pub async fn list_copiers(&self) -> AppResult<Vec<CopierDetail>> {
        let mut details = Vec::new();
        for copier in self.store.list_copiers().await? {
            details.push(copier_detail(self.store.as_ref(), copier).await?);
        }
        Ok(details)
    }

    async fn existing_copier(&self, id: i64) -> AppResult<Copier> {
        self.store
            .find_copier(id)
            .await?
            .ok_or_else(|| not_found_error("Copiadora", id))
    }

    pub async fn get_copier(&self, id: i64) -> AppResult<CopierDetail> {
        let copier = self.existing_copier(id).await?;
        copier_detail(self.store.as_ref(), copier).await
    }

    pub async fn create_copier(&self, request: CopierWriteRequest) -> AppResult<CopierDetail> {
        request.validate()?;
        let values = request.into_values(None)?;
        let copier = self.store.create_copier(&values).await?;
        info!("🖨️ Copiadora {} ({}) creada", copier.id, copier.model);
        copier_detail(self.store.as_ref(), copier).await
    }

    pub async fn update_copier(&self, id: i64, request: CopierWriteRequest, partial: bool) -> AppResult<CopierDetail> {
        request.validate()?;
        let copier = self.existing_copier(id).await?;
        let current = if partial {
            let features = self.store.copier_features(id).await?;
            let images = self.store.copier_images(id).await?;
            Some(CopierValues::from_parts(&copier, &features, &images))
        } else {
            None
        };

        let values = request.into_values(current.as_ref())?;
        let copier = self
            .store
            .update_copier(id, &values)
            .await?
            .ok_or_else(|| not_found_error("Copiadora", id))?;
        copier_detail(self.store.as_ref(), copier).await
    }

    pub async fn delete_copier(&self, id: i64) -> AppResult<()> {
        if !self.store.delete_copier(id).await? {
            return Err(not_found_error("Copiadora", id));
        }
        info!("🗑️ Copiadora {} eliminada", id);
        Ok(())
    }
}
