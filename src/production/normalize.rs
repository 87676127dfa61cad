use chrono::NaiveDate;
use serde::Serialize;

use super::types::ProductionOrderRecord;
use crate::normalize::{parse_number_text, parse_raw_date};

/// Typed view over the raw text fields of an order.
///
/// Unparsable text is `None`; the raw value stays on the record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOrder {
    pub quantity: Option<f64>,
    pub order_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
}

impl ProductionOrderRecord {
    /// Parse quantity and dates. `M/D` dates take `reference_year`.
    pub fn normalized(&self, reference_year: i32) -> NormalizedOrder {
        let date = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|text| parse_raw_date(text, reference_year))
        };
        NormalizedOrder {
            quantity: self.quantity_raw.as_deref().and_then(parse_number_text),
            order_date: date(&self.order_date_raw),
            deadline: date(&self.deadline_raw),
        }
    }
}
