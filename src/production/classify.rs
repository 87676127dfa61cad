//! Positional row classification of the production-plan sheet.

use chrono::{DateTime, Local, Utc};
use tracing::info;
use uuid::Uuid;

use super::error::SheetNotFoundError;
use super::layout;
use super::types::{FileSnapshotRecord, ProductionOrderRecord, ProductionPlan, RowType};
use crate::config::ProductionLayout;
use crate::normalize::iso_week_number;
use crate::sheet::{RawCell, RawSheet, Workbook};

/// Classify a row by its trimmed client text.
pub fn classify_row(client: Option<&str>) -> RowType {
    match client {
        Some(layout::NEXT_WEEK_MARKER) => RowType::DividerNextWeek,
        Some(text) if text.starts_with(layout::MANAGED_PREFIX) => RowType::DividerManaged,
        _ => RowType::Data,
    }
}

/// Classify every row from the first data row on.
///
/// Rows whose client and model cells are both blank are skipped. Every
/// other column is copied as trimmed text without parsing.
pub fn classify(
    sheet: &RawSheet,
    data_start_row: usize,
    snapshot_id: Uuid,
) -> Vec<ProductionOrderRecord> {
    let first = data_start_row.saturating_sub(1);
    let mut skipped = 0usize;
    let mut orders = Vec::new();

    for (index, row) in sheet.rows.iter().enumerate().skip(first) {
        let field = |col: usize| row.get(col).and_then(RawCell::to_trimmed);
        let client = field(layout::CLIENT);
        let model = field(layout::MODEL);
        if client.is_none() && model.is_none() {
            skipped += 1;
            continue;
        }

        orders.push(ProductionOrderRecord {
            snapshot_id,
            row_number: index + 1,
            row_type: classify_row(client.as_deref()),
            week_number: field(layout::WEEK),
            client_name: client,
            model_name: model,
            quantity_raw: field(layout::QUANTITY),
            order_date_raw: field(layout::ORDER_DATE),
            deadline_raw: field(layout::DEADLINE),
            version_management_note: field(layout::VERSION_MANAGEMENT),
            line: field(layout::LINE),
            board_side: field(layout::BOARD_SIDE),
            post_process: field(layout::POST_PROCESS),
            rohs_flag: field(layout::ROHS),
            note: field(layout::NOTE),
        });
    }

    let dividers = orders.iter().filter(|o| o.row_type != RowType::Data).count();
    info!(
        sheet = %sheet.name,
        orders = orders.len(),
        dividers,
        skipped,
        "classified production plan rows"
    );
    orders
}

/// Parse the production-plan sheet of a workbook into a snapshot and its orders.
pub fn parse_production_plan(
    workbook: &Workbook,
    layout: &ProductionLayout,
    file_name: &str,
    imported_at: DateTime<Local>,
) -> Result<ProductionPlan, SheetNotFoundError> {
    let sheet = workbook
        .sheet(&layout.sheet_name)
        .ok_or_else(|| SheetNotFoundError {
            sheet: layout.sheet_name.clone(),
        })?;

    let written_at_raw = sheet
        .cell(
            layout.written_at_row.saturating_sub(1),
            layout.written_at_column.saturating_sub(1),
        )
        .to_trimmed();
    let week = iso_week_number(imported_at.date_naive());

    let snapshot = FileSnapshotRecord {
        id: Uuid::new_v4(),
        file_name: file_name.to_string(),
        written_at_raw,
        row_count: sheet
            .row_count()
            .saturating_sub(layout.data_start_row.saturating_sub(1)),
        current_week_label: format!("ww{week}"),
        imported_at: imported_at.with_timezone(&Utc),
    };
    let orders = classify(sheet, layout.data_start_row, snapshot.id);

    Ok(ProductionPlan { snapshot, orders })
}
