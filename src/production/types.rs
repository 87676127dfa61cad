use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a production-plan row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowType {
    Data,
    /// Section header for next week's waiting models
    DividerNextWeek,
    /// Section header for managed models
    DividerManaged,
}

impl RowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowType::Data => "data",
            RowType::DividerNextWeek => "divider_next_week",
            RowType::DividerManaged => "divider_managed",
        }
    }
}

/// One ingested upload of a production plan. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSnapshotRecord {
    pub id: Uuid,
    pub file_name: String,
    /// "Written at" label exactly as it appears in the sheet
    pub written_at_raw: Option<String>,
    /// Physical rows from the first data row to the last used row
    pub row_count: usize,
    /// `ww` followed by the ISO week of the ingestion date
    pub current_week_label: String,
    pub imported_at: DateTime<Utc>,
}

/// One classified production-plan row.
///
/// Dates and quantities stay as raw text; see
/// [`ProductionOrderRecord::normalized`] for typed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrderRecord {
    pub snapshot_id: Uuid,
    /// 1-based physical row in the source sheet
    pub row_number: usize,
    pub row_type: RowType,
    pub week_number: Option<String>,
    pub client_name: Option<String>,
    pub model_name: Option<String>,
    pub quantity_raw: Option<String>,
    pub order_date_raw: Option<String>,
    pub deadline_raw: Option<String>,
    pub version_management_note: Option<String>,
    pub line: Option<String>,
    pub board_side: Option<String>,
    pub post_process: Option<String>,
    pub rohs_flag: Option<String>,
    pub note: Option<String>,
}

/// A snapshot together with every order parsed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlan {
    pub snapshot: FileSnapshotRecord,
    pub orders: Vec<ProductionOrderRecord>,
}

impl ProductionPlan {
    /// Data rows only, ordered by source row.
    pub fn data_orders(&self) -> Vec<&ProductionOrderRecord> {
        let mut orders: Vec<_> = self
            .orders
            .iter()
            .filter(|order| order.row_type == RowType::Data)
            .collect();
        orders.sort_by_key(|order| order.row_number);
        orders
    }
}
