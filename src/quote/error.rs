use std::fmt;

use thiserror::Error;

/// A structurally required quote sheet is absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationError {
    #[error("expected sheet '{sheet}' not found")]
    MissingSheet { sheet: String },
}

/// One failed submission rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Field path such as `items[2].name`
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every rule a quote failed, reported together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("quote is not submittable: {}", .issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}
