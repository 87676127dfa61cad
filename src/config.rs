//! Ingestion options.
//!
//! Deployments usually load these once from YAML and share them across
//! requests; every field has a default matching the production workbooks.
//!
//! # Examples
//!
//! ```rust
//! use quotesheet::IngestOptions;
//!
//! let options = IngestOptions::new()
//!     .with_password("8715")
//!     .with_model_timeout_secs(60);
//!
//! let yaml = "password: '8715'\nproduction:\n  data_start_row: 10\n";
//! let loaded = IngestOptions::from_yaml_str(yaml)?;
//! assert_eq!(loaded.production.data_start_row, 10);
//! # Ok::<(), quotesheet::Error>(())
//! ```
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::error::{Error, Result};
use crate::quote::SupplierInfo;

/// Sheet names of the three-table quote workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSheetNames {
    pub quotes: String,
    pub items: String,
    pub processes: String,
}

impl Default for QuoteSheetNames {
    fn default() -> Self {
        Self {
            quotes: "견적서".to_string(),
            items: "견적품목".to_string(),
            processes: "견적공정".to_string(),
        }
    }
}

/// Fixed layout of the production-plan sheet. Rows and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionLayout {
    pub sheet_name: String,
    /// First data row
    pub data_start_row: usize,
    /// Cell holding the "written at" label
    pub written_at_row: usize,
    pub written_at_column: usize,
}

impl Default for ProductionLayout {
    fn default() -> Self {
        Self {
            sheet_name: "생산 계획".to_string(),
            data_start_row: 9,
            written_at_row: 7,
            written_at_column: 1,
        }
    }
}

/// Settings for the model-assisted extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    pub timeout_secs: u64,
    /// Refuse sheets with more filled rows than this; no limit when `None`
    pub max_sheet_rows: Option<usize>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            max_sheet_rows: None,
        }
    }
}

impl ModelOptions {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Workbook password; decryption is skipped when `None`
    pub password: Option<String>,
    pub quote_sheets: QuoteSheetNames,
    pub production: ProductionLayout,
    pub model: ModelOptions,
    /// Supplier stamped on quotes from the three-sheet path
    pub default_supplier: Option<SupplierInfo>,
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("quote_sheets", &self.quote_sheets)
            .field("production", &self.production)
            .field("model", &self.model)
            .field("default_supplier", &self.default_supplier)
            .finish()
    }
}

impl IngestOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from YAML; absent keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self =
            serde_saphyr::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        options.check()?;
        Ok(options)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    #[inline]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[inline]
    pub fn with_quote_sheets(mut self, names: QuoteSheetNames) -> Self {
        self.quote_sheets = names;
        self
    }

    #[inline]
    pub fn with_production_layout(mut self, layout: ProductionLayout) -> Self {
        self.production = layout;
        self
    }

    #[inline]
    pub fn with_model_timeout_secs(mut self, secs: u64) -> Self {
        self.model.timeout_secs = secs;
        self
    }

    #[inline]
    pub fn with_max_sheet_rows(mut self, rows: usize) -> Self {
        self.model.max_sheet_rows = Some(rows);
        self
    }

    #[inline]
    pub fn with_default_supplier(mut self, supplier: SupplierInfo) -> Self {
        self.default_supplier = Some(supplier);
        self
    }

    fn check(&self) -> Result<()> {
        let layout = &self.production;
        if layout.data_start_row == 0 || layout.written_at_row == 0 || layout.written_at_column == 0 {
            return Err(Error::Config(
                "production rows and columns are 1-based and must be non-zero".to_string(),
            ));
        }
        if self.model.timeout_secs == 0 {
            return Err(Error::Config("model.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
