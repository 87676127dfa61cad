//! Three-table join: quotes ← items ← processes.
//!
//! Process rows are grouped by item key, each item row expands into one line
//! per process row (or a single line when it has none), and each quote row
//! collects the lines emitted under its quote number.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::columns;
use super::error::ReconciliationError;
use super::types::{QuoteItemRecord, QuoteRecord};
use crate::config::QuoteSheetNames;
use crate::normalize::{
    discount_or_zero, excel_serial_to_date, number_or_zero, price_or_none, text_or_empty,
    text_or_none,
};
use crate::sheet::{SheetTable, TableRow, Workbook};

/// Billing values of one process-sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub process: String,
    pub quantity: f64,
    pub unit_price: Option<f64>,
    pub amount: f64,
    pub note: Option<String>,
}

impl ProcessRow {
    fn from_row(row: &TableRow<'_>) -> Self {
        Self {
            process: text_or_empty(row.get(columns::PROCESS)),
            quantity: number_or_zero(row.get(columns::QUANTITY)),
            unit_price: price_or_none(row.get(columns::UNIT_PRICE)),
            amount: number_or_zero(row.get(columns::AMOUNT)),
            note: text_or_none(row.get(columns::NOTE)),
        }
    }
}

/// Process rows grouped by item key, in source order.
#[derive(Debug, Clone, Default)]
pub struct ProcessGroups {
    groups: HashMap<String, Vec<ProcessRow>>,
}

impl ProcessGroups {
    pub fn from_table(table: &SheetTable<'_>) -> Self {
        let mut groups: HashMap<String, Vec<ProcessRow>> = HashMap::new();
        for row in table.rows() {
            let item_key = text_or_empty(row.get(columns::ITEM_ID));
            groups.entry(item_key).or_default().push(ProcessRow::from_row(&row));
        }
        Self { groups }
    }

    /// Process rows of an item; empty for unknown or blank keys.
    pub fn get(&self, item_key: &str) -> &[ProcessRow] {
        if item_key.is_empty() {
            return &[];
        }
        self.groups.get(item_key).map_or(&[], Vec::as_slice)
    }
}

/// Reconciled line items grouped by quote number, in emission order.
#[derive(Debug, Clone, Default)]
pub struct ItemsByQuote {
    items: HashMap<String, Vec<QuoteItemRecord>>,
    /// Quote numbers in first-seen order
    order: Vec<String>,
}

impl ItemsByQuote {
    pub fn from_table(table: &SheetTable<'_>, processes: &ProcessGroups) -> Self {
        let mut grouped = Self::default();
        for row in table.rows() {
            let quote_number = text_or_empty(row.get(columns::QUOTE_NUMBER));
            let item_key = text_or_empty(row.get(columns::ITEM_ID));
            let name = text_or_empty(row.get(columns::ITEM_NAME));

            let group = processes.get(&item_key);
            if group.is_empty() {
                let item = QuoteItemRecord::new(
                    name,
                    "",
                    number_or_zero(row.get(columns::QUANTITY)),
                    price_or_none(row.get(columns::UNIT_PRICE)),
                    number_or_zero(row.get(columns::AMOUNT)),
                )
                .with_note(text_or_none(row.get(columns::NOTE)));
                grouped.push(&quote_number, item);
            } else {
                for process in group {
                    let item = QuoteItemRecord::new(
                        name.clone(),
                        process.process.clone(),
                        process.quantity,
                        process.unit_price,
                        process.amount,
                    )
                    .with_note(process.note.clone());
                    grouped.push(&quote_number, item);
                }
            }
        }
        grouped
    }

    fn push(&mut self, quote_number: &str, item: QuoteItemRecord) {
        if !self.items.contains_key(quote_number) {
            self.order.push(quote_number.to_string());
        }
        self.items
            .entry(quote_number.to_string())
            .or_default()
            .push(item);
    }

    pub fn get(&self, quote_number: &str) -> &[QuoteItemRecord] {
        self.items.get(quote_number).map_or(&[], Vec::as_slice)
    }

    /// Quote numbers that received items, in first-seen order.
    pub fn quote_numbers(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Reconcile the quote sheets of a decoded workbook.
///
/// Only a missing quote sheet is an error; missing item or process sheets
/// yield quotes without items. Non-numeric registration dates fall back to
/// `ingested_on`.
pub fn reconcile(
    workbook: &Workbook,
    names: &QuoteSheetNames,
    ingested_on: NaiveDate,
) -> Result<Vec<QuoteRecord>, ReconciliationError> {
    let quote_sheet =
        workbook
            .sheet(&names.quotes)
            .ok_or_else(|| ReconciliationError::MissingSheet {
                sheet: names.quotes.clone(),
            })?;
    let quotes = SheetTable::from_sheet(quote_sheet);
    let items = workbook.sheet(&names.items).map(SheetTable::from_sheet);
    let processes = workbook.sheet(&names.processes).map(SheetTable::from_sheet);

    Ok(reconcile_tables(
        &quotes,
        items.as_ref(),
        processes.as_ref(),
        ingested_on,
    ))
}

/// Join already-located tables. Never fails.
pub fn reconcile_tables(
    quotes: &SheetTable<'_>,
    items: Option<&SheetTable<'_>>,
    processes: Option<&SheetTable<'_>>,
    ingested_on: NaiveDate,
) -> Vec<QuoteRecord> {
    let process_groups = processes.map(ProcessGroups::from_table).unwrap_or_default();
    let items_by_quote = items
        .map(|table| ItemsByQuote::from_table(table, &process_groups))
        .unwrap_or_default();

    let records: Vec<QuoteRecord> = quotes
        .rows()
        .map(|row| quote_from_row(&row, &items_by_quote, ingested_on))
        .collect();

    let orphans = items_by_quote
        .quote_numbers()
        .filter(|number| !records.iter().any(|q| q.quote_number == *number))
        .count();
    if orphans > 0 {
        debug!(orphans, "item rows reference quote numbers absent from the quote sheet");
    }
    info!(
        quotes = records.len(),
        item_rows = items.map_or(0, SheetTable::len),
        process_rows = processes.map_or(0, SheetTable::len),
        "reconciled quote workbook"
    );
    records
}

fn quote_from_row(row: &TableRow<'_>, items: &ItemsByQuote, ingested_on: NaiveDate) -> QuoteRecord {
    let quote_number = text_or_empty(row.get(columns::QUOTE_NUMBER));
    let date = row
        .get(columns::REGISTERED_AT)
        .as_number()
        .and_then(excel_serial_to_date)
        .unwrap_or(ingested_on);

    let mut quote = QuoteRecord::new(quote_number, date);
    quote.recipient_name = text_or_empty(row.get(columns::RECIPIENT));
    quote.recipient_contact = text_or_none(row.get(columns::RECIPIENT_CONTACT));
    quote.notes = text_or_none(row.get(columns::MEMO));
    quote.discount = discount_or_zero(row.get(columns::DISCOUNT));

    let quote_items = items.get(&quote.quote_number).to_vec();
    quote.with_items(quote_items)
}
