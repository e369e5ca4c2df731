//! Modelo de Franquia (período de facturación)
//!
//! El valor total nunca llega desde afuera: se calcula a partir de
//! quantidade × preco_unidade cada vez que se guarda el registro.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::FromRow;

use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::MAX_TOTAL_VALUE;

/// Franquia - mapea a la tabla billing_periods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct BillingPeriod {
    pub id: i64,
    #[serde(rename = "periodo")]
    pub period_months: i32,
    #[serde(rename = "folha")]
    pub paper_type: String,
    #[serde(rename = "colorida")]
    pub is_color: bool,
    #[serde(rename = "quantidade")]
    pub quantity: i32,
    #[serde(rename = "preco_unidade")]
    pub unit_price: Decimal,
    #[serde(rename = "valor")]
    pub total_value: Decimal,
}

/// Calcula quantidade × preco_unidade con dos decimales.
///
/// Valores ausentes cuentan como cero. Devuelve `None` si el producto
/// no entra en un `Decimal`.
pub fn compute_total(quantity: Option<i32>, unit_price: Option<Decimal>) -> Option<Decimal> {
    let quantity = Decimal::from(quantity.unwrap_or(0));
    let unit_price = unit_price.unwrap_or(Decimal::ZERO);

    let mut total = quantity
        .checked_mul(unit_price)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    total.rescale(2);
    Some(total)
}

/// Valores persistibles de una franquia, con el total ya calculado.
///
/// La única forma de construirlos es `BillingPeriodValues::new`, así que
/// el total guardado siempre corresponde a la cantidad y el precio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPeriodValues {
    period_months: i32,
    paper_type: String,
    is_color: bool,
    quantity: i32,
    unit_price: Decimal,
    total_value: Decimal,
}

impl BillingPeriodValues {
    pub fn new(
        period_months: i32,
        paper_type: String,
        is_color: bool,
        quantity: Option<i32>,
        unit_price: Option<Decimal>,
    ) -> AppResult<Self> {
        let total_value = compute_total(quantity, unit_price)
            .filter(|total| *total <= MAX_TOTAL_VALUE)
            .ok_or_else(|| validation_error("valor", "O valor total excede o máximo permitido."))?;

        let mut unit_price = unit_price.unwrap_or(Decimal::ZERO);
        unit_price.rescale(2);

        Ok(Self {
            period_months,
            paper_type,
            is_color,
            quantity: quantity.unwrap_or(0),
            unit_price,
            total_value,
        })
    }

    pub fn period_months(&self) -> i32 {
        self.period_months
    }

    pub fn paper_type(&self) -> &str {
        &self.paper_type
    }

    pub fn is_color(&self) -> bool {
        self.is_color
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn total_value(&self) -> Decimal {
        self.total_value
    }

    /// Construye la fila resultante para el id dado
    pub fn into_row(self, id: i64) -> BillingPeriod {
        BillingPeriod {
            id,
            period_months: self.period_months,
            paper_type: self.paper_type,
            is_color: self.is_color,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_value: self.total_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_compute_total_exact_decimal() {
        let total = compute_total(Some(100), Some(dec("0.50"))).unwrap();
        assert_eq!(total, dec("50.00"));
        assert_eq!(total.to_string(), "50.00");

        // 0.1 * 3 no sufre errores de punto flotante
        assert_eq!(compute_total(Some(3), Some(dec("0.10"))).unwrap().to_string(), "0.30");
    }

    #[test]
    fn test_compute_total_missing_inputs_are_zero() {
        assert_eq!(compute_total(None, Some(dec("2.00"))).unwrap().to_string(), "0.00");
        assert_eq!(compute_total(Some(10), None).unwrap().to_string(), "0.00");
        assert_eq!(compute_total(None, None).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_compute_total_always_two_places() {
        assert_eq!(compute_total(Some(7), Some(dec("3"))).unwrap().to_string(), "21.00");
    }

    #[test]
    fn test_values_carry_computed_total() {
        let values = BillingPeriodValues::new(12, "A4".into(), true, Some(2500), Some(dec("0.12"))).unwrap();
        assert_eq!(values.total_value(), dec("300.00"));
        assert_eq!(values.quantity(), 2500);

        let row = values.into_row(9);
        assert_eq!(row.id, 9);
        assert_eq!(row.total_value.to_string(), "300.00");
    }

    #[test]
    fn test_values_defaults_missing_numbers() {
        let values = BillingPeriodValues::new(6, "A3".into(), false, None, None).unwrap();
        assert_eq!(values.quantity(), 0);
        assert_eq!(values.unit_price().to_string(), "0.00");
        assert_eq!(values.total_value().to_string(), "0.00");
    }

    #[test]
    fn test_values_reject_total_overflow() {
        let result = BillingPeriodValues::new(1, "A4".into(), false, Some(i32::MAX), Some(dec("999999.99")));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_wire_names() {
        let row = BillingPeriodValues::new(12, "A4".into(), false, Some(100), Some(dec("0.50")))
            .unwrap()
            .into_row(1);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["valor"], "50.00");
        assert_eq!(json["preco_unidade"], "0.50");
        assert_eq!(json["quantidade"], 100);
    }
}
