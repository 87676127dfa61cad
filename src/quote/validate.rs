use super::error::{ValidationError, ValidationIssue};
use super::types::QuoteRecord;

impl QuoteRecord {
    /// Check the quote is complete enough to submit.
    ///
    /// Requires a recipient, at least one item, a name on every item and
    /// quantities of at least 1. Ingestion never calls this; ingested quotes
    /// may be drafts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        let mut issue = |field: String, message: &str| {
            issues.push(ValidationIssue {
                field,
                message: message.to_string(),
            });
        };

        if self.recipient_name.trim().is_empty() {
            issue("recipientName".to_string(), "recipient name is required");
        }
        if self.items.is_empty() {
            issue("items".to_string(), "at least one item is required");
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                issue(format!("items[{i}].name"), "item name is required");
            }
            if item.quantity.is_nan() || item.quantity < 1.0 {
                issue(format!("items[{i}].quantity"), "quantity must be at least 1");
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::quote::{QuoteItemRecord, QuoteRecord};
    use chrono::NaiveDate;

    fn quote() -> QuoteRecord {
        let mut quote = QuoteRecord::new("Q1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        quote.recipient_name = "ACME".to_string();
        quote.with_items(vec![QuoteItemRecord::new("Widget", "", 2.0, None, 0.0)])
    }

    #[test]
    fn test_valid_quote() {
        assert!(quote().validate().is_ok());
    }

    #[test]
    fn test_reports_every_issue() {
        let mut q = quote();
        q.recipient_name = " ".to_string();
        q.items.push(QuoteItemRecord::new("", "", 0.0, None, 0.0));
        let err = q.validate().unwrap_err();
        let fields: Vec<_> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, ["recipientName", "items[1].name", "items[1].quantity"]);
        assert!(err.to_string().contains("items[1].name: item name is required"));
    }

    #[test]
    fn test_no_items() {
        let q = quote().with_items(Vec::new());
        let err = q.validate().unwrap_err();
        assert_eq!(err.issues[0].field, "items");
    }
}
