use serde::Serialize;

use super::types::QuoteItemRecord;

/// Visual merge info for one item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSpan {
    /// Rows covered by a group's first item; 0 for the rows it absorbs
    pub row_span: usize,
    pub is_first: bool,
    pub is_last_in_span: bool,
}

/// Group consecutive items sharing a name.
pub fn item_spans(items: &[QuoteItemRecord]) -> Vec<ItemSpan> {
    let mut spans: Vec<ItemSpan> = Vec::with_capacity(items.len());
    let mut group_start = 0usize;

    for (i, item) in items.iter().enumerate() {
        if i > 0 && item.name == items[i - 1].name {
            spans[group_start] = ItemSpan {
                row_span: spans[group_start].row_span + 1,
                is_last_in_span: false,
                ..spans[group_start]
            };
            spans[i - 1].is_last_in_span = false;
            spans.push(ItemSpan {
                row_span: 0,
                is_first: false,
                is_last_in_span: true,
            });
        } else {
            group_start = i;
            spans.push(ItemSpan {
                row_span: 1,
                is_first: true,
                is_last_in_span: true,
            });
        }
    }
    spans
}
