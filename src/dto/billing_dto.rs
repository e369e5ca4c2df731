use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::FieldMerge;
use crate::models::billing::{BillingPeriod, BillingPeriodValues};
use crate::utils::errors::AppResult;
use crate::utils::validation::validate_unit_price;

// Request para crear/actualizar una franquia.
// `valor` no se acepta: si llega en el body se ignora.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BillingPeriodWriteRequest {
    #[validate(range(min = 0))]
    pub periodo: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub folha: Option<String>,
    pub colorida: Option<bool>,
    #[validate(range(min = 0))]
    pub quantidade: Option<i32>,
    #[validate(custom = "validate_unit_price")]
    pub preco_unidade: Option<Decimal>,
}

impl BillingPeriodWriteRequest {
    /// Combina con la franquia actual y recalcula el total
    pub fn into_values(self, current: Option<&BillingPeriod>) -> AppResult<BillingPeriodValues> {
        let mut merge = FieldMerge::default();
        let period_months = merge.required("periodo", self.periodo, current.map(|c| c.period_months));
        let paper_type = merge.required("folha", self.folha, current.map(|c| c.paper_type.clone()));
        merge.finish()?;

        let is_color = self.colorida.or(current.map(|c| c.is_color)).unwrap_or(false);
        let quantity = self.quantidade.or(current.map(|c| c.quantity));
        let unit_price = self.preco_unidade.or(current.map(|c| c.unit_price));

        BillingPeriodValues::new(period_months, paper_type, is_color, quantity, unit_price)
    }
}
