use async_trait::async_trait;

use super::{BillingStore, PgStore};
use crate::models::billing::{BillingPeriod, BillingPeriodValues};
use crate::models::copier_instance::{CopierInstance, CopierInstanceValues};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

const BILLING_PERIOD_COLUMNS: &str = "id, period_months, paper_type, is_color, quantity, unit_price, total_value";
const COPIER_INSTANCE_COLUMNS: &str =
    "id, customer_id, copier_id, billing_period_id, serial_number, acquisition_type, maintenance_frequency_months";

/// Traduce violaciones de constraints de copier_instances a errores de API
fn map_instance_error(e: sqlx::Error, values: &CopierInstanceValues) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return conflict_error("CopierInstance", "numero_de_serie", &values.serial_number);
        }
        if db_err.is_foreign_key_violation() {
            return match db_err.constraint() {
                Some("copier_instances_customer_id_fkey") => not_found_error("Cliente", values.customer_id),
                Some("copier_instances_copier_id_fkey") => not_found_error("Copiadora", values.copier_id),
                _ => not_found_error("Franquia", values.billing_period_id),
            };
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl BillingStore for PgStore {
    async fn list_billing_periods(&self) -> AppResult<Vec<BillingPeriod>> {
        let query = format!("SELECT {} FROM billing_periods ORDER BY id", BILLING_PERIOD_COLUMNS);
        let periods = sqlx::query_as::<_, BillingPeriod>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(periods)
    }

    async fn find_billing_period(&self, id: i64) -> AppResult<Option<BillingPeriod>> {
        let query = format!("SELECT {} FROM billing_periods WHERE id = $1", BILLING_PERIOD_COLUMNS);
        let period = sqlx::query_as::<_, BillingPeriod>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(period)
    }

    async fn create_billing_period(&self, values: &BillingPeriodValues) -> AppResult<BillingPeriod> {
        let query = format!(
            r#"
            INSERT INTO billing_periods (period_months, paper_type, is_color, quantity, unit_price, total_value)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BILLING_PERIOD_COLUMNS
        );

        let period = sqlx::query_as::<_, BillingPeriod>(&query)
            .bind(values.period_months())
            .bind(values.paper_type())
            .bind(values.is_color())
            .bind(values.quantity())
            .bind(values.unit_price())
            .bind(values.total_value())
            .fetch_one(&self.pool)
            .await?;

        Ok(period)
    }

    async fn update_billing_period(&self, id: i64, values: &BillingPeriodValues) -> AppResult<Option<BillingPeriod>> {
        // El total se escribe junto con cantidad y precio en la misma sentencia
        let query = format!(
            r#"
            UPDATE billing_periods
            SET period_months = $2, paper_type = $3, is_color = $4,
                quantity = $5, unit_price = $6, total_value = $7
            WHERE id = $1
            RETURNING {}
            "#,
            BILLING_PERIOD_COLUMNS
        );

        let period = sqlx::query_as::<_, BillingPeriod>(&query)
            .bind(id)
            .bind(values.period_months())
            .bind(values.paper_type())
            .bind(values.is_color())
            .bind(values.quantity())
            .bind(values.unit_price())
            .bind(values.total_value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(period)
    }

    async fn delete_billing_period(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM billing_periods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_copier_instances(&self) -> AppResult<Vec<CopierInstance>> {
        let query = format!("SELECT {} FROM copier_instances ORDER BY id", COPIER_INSTANCE_COLUMNS);
        let instances = sqlx::query_as::<_, CopierInstance>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(instances)
    }

    async fn find_copier_instance(&self, id: i64) -> AppResult<Option<CopierInstance>> {
        let query = format!("SELECT {} FROM copier_instances WHERE id = $1", COPIER_INSTANCE_COLUMNS);
        let instance = sqlx::query_as::<_, CopierInstance>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(instance)
    }

    async fn create_copier_instance(&self, values: &CopierInstanceValues) -> AppResult<CopierInstance> {
        let query = format!(
            r#"
            INSERT INTO copier_instances
                (customer_id, copier_id, billing_period_id, serial_number, acquisition_type, maintenance_frequency_months)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            COPIER_INSTANCE_COLUMNS
        );

        sqlx::query_as::<_, CopierInstance>(&query)
            .bind(values.customer_id)
            .bind(values.copier_id)
            .bind(values.billing_period_id)
            .bind(&values.serial_number)
            .bind(values.acquisition_type.code())
            .bind(values.maintenance_frequency_months)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_instance_error(e, values))
    }

    async fn update_copier_instance(
        &self,
        id: i64,
        values: &CopierInstanceValues,
    ) -> AppResult<Option<CopierInstance>> {
        let query = format!(
            r#"
            UPDATE copier_instances
            SET customer_id = $2, copier_id = $3, billing_period_id = $4, serial_number = $5,
                acquisition_type = $6, maintenance_frequency_months = $7
            WHERE id = $1
            RETURNING {}
            "#,
            COPIER_INSTANCE_COLUMNS
        );

        sqlx::query_as::<_, CopierInstance>(&query)
            .bind(id)
            .bind(values.customer_id)
            .bind(values.copier_id)
            .bind(values.billing_period_id)
            .bind(&values.serial_number)
            .bind(values.acquisition_type.code())
            .bind(values.maintenance_frequency_months)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_instance_error(e, values))
    }

    async fn delete_copier_instance(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM copier_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
