//! Controller de franquias y copiadoras de clientes

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use super::catalog_controller::copier_detail;
use crate::dto::billing_dto::BillingPeriodWriteRequest;
use crate::dto::copier_instance_dto::{CopierInstanceDetail, CopierInstanceWriteRequest};
use crate::models::billing::BillingPeriod;
use crate::models::copier_instance::CopierInstance;
use crate::repositories::Store;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct BillingController {
    store: Arc<dyn Store>,
}

impl BillingController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ----- Franquias -----

    pub async fn list_billing_periods(&self) -> AppResult<Vec<BillingPeriod>> {
        self.store.list_billing_periods().await
    }

    pub async fn get_billing_period(&self, id: i64) -> AppResult<BillingPeriod> {
        self.store
            .find_billing_period(id)
            .await?
            .ok_or_else(|| not_found_error("Franquia", id))
    }

    /// El total se calcula en `into_values`; un `valor` enviado se ignora
    pub async fn create_billing_period(&self, request: BillingPeriodWriteRequest) -> AppResult<BillingPeriod> {
        request.validate()?;
        let values = request.into_values(None)?;
        let period = self.store.create_billing_period(&values).await?;
        info!("💰 Franquia {} creada: valor {}", period.id, period.total_value);
        Ok(period)
    }

    pub async fn update_billing_period(
        &self,
        id: i64,
        request: BillingPeriodWriteRequest,
        partial: bool,
    ) -> AppResult<BillingPeriod> {
        request.validate()?;
        let current = self.get_billing_period(id).await?;
        let values = request.into_values(partial.then_some(&current))?;
        let period = self
            .store
            .update_billing_period(id, &values)
            .await?
            .ok_or_else(|| not_found_error("Franquia", id))?;
        info!("💰 Franquia {} recalculada: valor {}", period.id, period.total_value);
        Ok(period)
    }

    pub async fn delete_billing_period(&self, id: i64) -> AppResult<()> {
        if !self.store.delete_billing_period(id).await? {
            return Err(not_found_error("Franquia", id));
        }
        info!("🗑️ Franquia {} eliminada", id);
        Ok(())
    }

    // ----- Copiadoras de clientes -----

    async fn instance_detail(&self, instance: CopierInstance) -> AppResult<CopierInstanceDetail> {
        let copier = self
            .store
            .find_copier(instance.copier_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Copiadora {} sin registro", instance.copier_id)))?;
        let period = self
            .store
            .find_billing_period(instance.billing_period_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Franquia {} sin registro", instance.billing_period_id)))?;

        let copiadora = copier_detail(self.store.as_ref(), copier).await?;
        Ok(CopierInstanceDetail::new(instance, copiadora, period))
    }

    async fn existing_instance(&self, id: i64) -> AppResult<CopierInstance> {
        self.store
            .find_copier_instance(id)
            .await?
            .ok_or_else(|| not_found_error("CopierInstance", id))
    }

    pub async fn list_copier_instances(&self) -> AppResult<Vec<CopierInstanceDetail>> {
        let mut details = Vec::new();
        for instance in self.store.list_copier_instances().await? {
            details.push(self.instance_detail(instance).await?);
        }
        Ok(details)
    }

    pub async fn get_copier_instance(&self, id: i64) -> AppResult<CopierInstanceDetail> {
        let instance = self.existing_instance(id).await?;
        self.instance_detail(instance).await
    }

    pub async fn create_copier_instance(&self, request: CopierInstanceWriteRequest) -> AppResult<CopierInstanceDetail> {
        request.validate()?;
        let values = request.into_values(None)?;
        let instance = self.store.create_copier_instance(&values).await?;
        info!(
            "🖨️ Copiadora {} instalada en cliente {} (serie {})",
            instance.copier_id, instance.customer_id, instance.serial_number
        );
        self.instance_detail(instance).await
    }

    pub async fn update_copier_instance(
        &self,
        id: i64,
        request: CopierInstanceWriteRequest,
        partial: bool,
    ) -> AppResult<CopierInstanceDetail> {
        request.validate()?;
        let current = self.existing_instance(id).await?;
        let values = request.into_values(partial.then_some(&current))?;
        let instance = self
            .store
            .update_copier_instance(id, &values)
            .await?
            .ok_or_else(|| not_found_error("CopierInstance", id))?;
        self.instance_detail(instance).await
    }

    pub async fn delete_copier_instance(&self, id: i64) -> AppResult<()> {
        if !self.store.delete_copier_instance(id).await? {
            return Err(not_found_error("CopierInstance", id));
        }
        Ok(())
    }
}
