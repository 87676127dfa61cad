//! Line amounts and quote totals. Every total in the crate goes through
//! [`compute_totals`].

use serde::{Deserialize, Serialize};

/// Flat VAT rate applied to the supply price
pub const VAT_RATE: f64 = 0.1;

/// Monetary summary of one quote.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub subtotal: f64,
    pub discount: f64,
    /// Subtotal minus discount; may be negative
    pub supply_price: f64,
    pub vat: f64,
    pub total: f64,
}

/// Line amount: `quantity × unit_price`, or the supplied amount when the
/// price is withheld.
#[inline]
pub fn to_amount(quantity: f64, unit_price: Option<f64>, supplied_amount: f64) -> f64 {
    match unit_price {
        Some(price) => quantity * price,
        None => supplied_amount,
    }
}

/// Totals over line amounts: VAT is `floor(supply × 0.1)`, never rounded up.
pub fn compute_totals<I>(amounts: I, discount: f64) -> QuoteTotals
where
    I: IntoIterator<Item = f64>,
{
    let subtotal: f64 = amounts.into_iter().sum();
    let supply_price = subtotal - discount;
    let vat = (supply_price * VAT_RATE).floor();
    QuoteTotals {
        subtotal,
        discount,
        supply_price,
        vat,
        total: supply_price + vat,
    }
}
