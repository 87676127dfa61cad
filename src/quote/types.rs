use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::{QuoteTotals, compute_totals, to_amount};

/// Issuing company details printed on a quote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierInfo {
    pub name: String,
    pub representative: String,
    pub address: String,
    pub business_number: String,
    pub contact: String,
}

/// One billed line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItemRecord {
    pub name: String,
    /// Process step label; "" when the item has no process rows
    pub process: String,
    pub quantity: f64,
    /// `None` means the price is withheld or quoted separately
    pub unit_price: Option<f64>,
    pub amount: f64,
    pub note: Option<String>,
    /// Position within the quote; defines display order
    pub ordinal: usize,
    /// Discovery index of the attached embedded image.
    ///
    /// On the three-sheet path this is the item's running position across
    /// every quote of the upload, not its per-quote `ordinal`: the second
    /// quote's first item takes the image after the first quote's items.
    /// On the model path it is whatever index the model reported.
    pub image_index: Option<usize>,
    /// Stored asset name, set once the image has been persisted
    pub image_name: Option<String>,
}

impl QuoteItemRecord {
    /// Build an item, deriving the amount from quantity and unit price.
    pub fn new(
        name: impl Into<String>,
        process: impl Into<String>,
        quantity: f64,
        unit_price: Option<f64>,
        supplied_amount: f64,
    ) -> Self {
        Self {
            name: name.into(),
            process: process.into(),
            quantity,
            unit_price,
            amount: to_amount(quantity, unit_price, supplied_amount),
            note: None,
            ordinal: 0,
            image_index: None,
            image_name: None,
        }
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Edit the quantity, keeping the amount consistent with the unit price.
    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
        self.amount = to_amount(quantity, self.unit_price, self.amount);
    }

    /// Edit the unit price; clearing it keeps the current amount.
    pub fn set_unit_price(&mut self, unit_price: Option<f64>) {
        self.unit_price = unit_price;
        self.amount = to_amount(self.quantity, unit_price, self.amount);
    }
}

/// A quote with its nested items and derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// External quote number; may be empty until a number is assigned
    pub quote_number: String,
    pub date: NaiveDate,
    pub recipient_name: String,
    pub recipient_contact: Option<String>,
    pub notes: Option<String>,
    pub discount: f64,
    pub source_file_path: Option<String>,
    pub supplier: Option<SupplierInfo>,
    pub items: Vec<QuoteItemRecord>,
    pub totals: QuoteTotals,
}

impl QuoteRecord {
    pub fn new(quote_number: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            quote_number: quote_number.into(),
            date,
            recipient_name: String::new(),
            recipient_contact: None,
            notes: None,
            discount: 0.0,
            source_file_path: None,
            supplier: None,
            items: Vec::new(),
            totals: QuoteTotals::default(),
        }
    }

    /// Replace the items, renumbering ordinals and recomputing totals.
    pub fn with_items(mut self, items: Vec<QuoteItemRecord>) -> Self {
        self.items = items;
        self.renumber();
        self.recompute_totals();
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self.recompute_totals();
        self
    }

    /// Assign ordinals 0.. in current item order.
    pub fn renumber(&mut self) {
        for (ordinal, item) in self.items.iter_mut().enumerate() {
            item.ordinal = ordinal;
        }
    }

    /// Recompute totals from the current items and discount.
    pub fn recompute_totals(&mut self) {
        self.totals = compute_totals(self.items.iter().map(|item| item.amount), self.discount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_item_amount_follows_price() {
        let item = QuoteItemRecord::new("Widget", "Cut", 10.0, Some(100.0), 1.0);
        assert_eq!(item.amount, 1000.0);
        let withheld = QuoteItemRecord::new("Widget", "", 10.0, None, 1234.0);
        assert_eq!(withheld.amount, 1234.0);
    }

    #[test]
    fn test_edits_keep_amount_consistent() {
        let mut item = QuoteItemRecord::new("Widget", "", 2.0, None, 700.0);
        item.set_unit_price(Some(300.0));
        assert_eq!(item.amount, 600.0);
        item.set_quantity(5.0);
        assert_eq!(item.amount, 1500.0);
        item.set_unit_price(None);
        assert_eq!(item.amount, 1500.0);
    }

    #[test]
    fn test_with_items_numbers_and_totals() {
        let quote = QuoteRecord::new("Q1", date())
            .with_items(vec![
                QuoteItemRecord::new("A", "", 1.0, Some(1000.0), 0.0),
                QuoteItemRecord::new("B", "", 1.0, Some(500.0), 0.0),
            ])
            .with_discount(100.0);
        assert_eq!(quote.items[1].ordinal, 1);
        assert_eq!(quote.totals.subtotal, 1500.0);
        assert_eq!(quote.totals.supply_price, 1400.0);
        assert_eq!(quote.totals.vat, 140.0);
        assert_eq!(quote.totals.total, 1540.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let quote = QuoteRecord::new("Q1", date());
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["quoteNumber"], "Q1");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["totals"]["supplyPrice"], 0.0);
    }
}
