//! Validation of model completions into quote records.
//!
//! The completion is untrusted input. Every field is type-checked before it
//! reaches a [`QuoteRecord`]; a mismatch rejects the whole response with the
//! JSON path of the offending value. Optional fields that are absent or
//! `null` take their documented defaults.

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};

use super::error::ExtractionError;
use crate::normalize::parse_raw_date;
use crate::quote::{QuoteItemRecord, QuoteRecord, SupplierInfo};

type Object = Map<String, Value>;

/// Locate the JSON document in a completion, stripping Markdown fences.
pub fn extract_json_document(text: &str) -> Option<&str> {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let body = match after.split_once('\n') {
            Some((tag, rest)) if !tag.trim_start().starts_with(['{', '[']) => rest,
            _ => after,
        };
        if let Some(end) = body.find("```") {
            let inner = body[..end].trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    let start = trimmed.find('{')?;
    match trimmed.rfind('}') {
        Some(end) if end > start => Some(&trimmed[start..=end]),
        // Unterminated object; let the parser report where it stops
        _ => Some(&trimmed[start..]),
    }
}

/// Parse and validate a completion into quotes.
///
/// Quotes without a usable date take `ingested_on`. An empty `quotes`
/// array is a valid answer and yields no records.
pub fn parse_quotes_response(
    text: &str,
    ingested_on: NaiveDate,
) -> Result<Vec<QuoteRecord>, ExtractionError> {
    let document = extract_json_document(text).ok_or(ExtractionError::NoDocument)?;
    let root: Value =
        serde_json::from_str(document).map_err(|e| ExtractionError::Parse(e.to_string()))?;

    let root = as_object(&root, "$")?;
    let quotes = match root.get("quotes") {
        Some(Value::Array(quotes)) => quotes,
        Some(_) => return Err(ExtractionError::schema("quotes", "expected an array")),
        None => return Err(ExtractionError::schema("quotes", "is required")),
    };

    quotes
        .iter()
        .enumerate()
        .map(|(i, quote)| parse_quote(quote, &format!("quotes[{i}]"), ingested_on))
        .collect()
}

fn parse_quote(value: &Value, path: &str, ingested_on: NaiveDate) -> Result<QuoteRecord, ExtractionError> {
    let obj = as_object(value, path)?;

    let date = match optional_text(obj, "date", path)? {
        Some(raw) => parse_raw_date(&raw, ingested_on.year())
            .ok_or_else(|| ExtractionError::schema(field_path(path, "date"), "unrecognized date"))?,
        None => ingested_on,
    };

    let supplier = match obj.get("supplier") {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_supplier(value, &field_path(path, "supplier"))?),
    };

    let items = match obj.get("items") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_item(item, &format!("{path}.items[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(ExtractionError::schema(field_path(path, "items"), "expected an array")),
        None => return Err(ExtractionError::schema(field_path(path, "items"), "is required")),
    };

    let discount = optional_number(obj, "discount", path)?
        .filter(|discount| *discount >= 0.0)
        .unwrap_or(0.0);

    let number = optional_text(obj, "quoteNumber", path)?.unwrap_or_default();
    let mut quote = QuoteRecord::new(number, date)
        .with_items(items)
        .with_discount(discount);
    quote.recipient_name = required_text(obj, "recipientName", path)?;
    quote.recipient_contact = optional_text(obj, "recipientContact", path)?;
    quote.notes = optional_text(obj, "notes", path)?;
    quote.supplier = supplier;
    Ok(quote)
}

fn parse_supplier(value: &Value, path: &str) -> Result<SupplierInfo, ExtractionError> {
    let obj = as_object(value, path)?;
    let text = |key: &str| optional_text(obj, key, path).map(Option::unwrap_or_default);
    Ok(SupplierInfo {
        name: text("name")?,
        representative: text("representative")?,
        address: text("address")?,
        business_number: text("businessNumber")?,
        contact: text("contact")?,
    })
}

fn parse_item(value: &Value, path: &str) -> Result<QuoteItemRecord, ExtractionError> {
    let obj = as_object(value, path)?;
    let name = required_text(obj, "name", path)?;
    let process = optional_text(obj, "process", path)?.unwrap_or_default();
    let quantity = optional_number(obj, "quantity", path)?.unwrap_or(0.0);
    let unit_price = optional_number(obj, "unitPrice", path)?;
    let amount = optional_number(obj, "amount", path)?.unwrap_or(0.0);

    let mut item = QuoteItemRecord::new(name, process, quantity, unit_price, amount)
        .with_note(optional_text(obj, "note", path)?);
    item.image_index = optional_index(obj, "imageIndex", path)?;
    Ok(item)
}

fn field_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

fn as_object<'v>(value: &'v Value, path: &str) -> Result<&'v Object, ExtractionError> {
    value
        .as_object()
        .ok_or_else(|| ExtractionError::schema(path, "expected an object"))
}

fn required_text(obj: &Object, key: &str, path: &str) -> Result<String, ExtractionError> {
    match obj.get(key) {
        Some(Value::String(text)) => Ok(text.trim().to_string()),
        None | Some(Value::Null) => Err(ExtractionError::schema(field_path(path, key), "is required")),
        Some(_) => Err(ExtractionError::schema(field_path(path, key), "expected a string")),
    }
}

/// Trimmed text; blank strings count as absent.
fn optional_text(obj: &Object, key: &str, path: &str) -> Result<Option<String>, ExtractionError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => {
            let text = text.trim();
            Ok((!text.is_empty()).then(|| text.to_string()))
        },
        Some(_) => Err(ExtractionError::schema(field_path(path, key), "expected a string or null")),
    }
}

fn optional_number(obj: &Object, key: &str, path: &str) -> Result<Option<f64>, ExtractionError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ExtractionError::schema(field_path(path, key), "number out of range")),
        Some(_) => Err(ExtractionError::schema(field_path(path, key), "expected a number or null")),
    }
}

fn optional_index(obj: &Object, key: &str, path: &str) -> Result<Option<usize>, ExtractionError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                ExtractionError::schema(field_path(path, key), "expected a non-negative integer")
            }),
        Some(_) => Err(ExtractionError::schema(
            field_path(path, key),
            "expected a non-negative integer or null",
        )),
    }
}
