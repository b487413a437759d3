//! Per-item lot summary: every lot touching an item, aggregated

use serde::Serialize;

use crate::coerce::DateValue;
use crate::fields::{date_field, item, lot, normalize_key, serial, upper_field};
use crate::indexes::SnapshotIndexes;
use crate::snapshot::{Record, Row};
use crate::views::lot::{aggregate_bins, max_date, LotBinQuantity};

/// Aggregated summary of all lots for one item. Degrades to empty arrays
/// with `has_data: false` when the item has no lot data.
#[derive(Debug, Serialize)]
pub struct ItemLotSummaryView {
    pub item_no: String,
    /// One row per lot, sorted by last-move date descending.
    pub lots: Vec<LotSummaryRow>,
    /// Raw serial-level detail rows for tabular display.
    pub serials: Vec<Record>,
    /// Raw lot-history timeline rows for tabular display.
    pub history: Vec<Record>,
    pub has_data: bool,
}

/// One aggregated lot row.
#[derive(Debug, Serialize)]
pub struct LotSummaryRow {
    pub lot_no: String,
    pub on_hand_qty: f64,
    /// On-hand quantity grouped by (location, bin).
    pub bins: Vec<LotBinQuantity>,
    /// Max date across the lot's history rows.
    pub last_move: DateValue,
    pub expiry_date: DateValue,
    pub serial_count: usize,
}

impl SnapshotIndexes {
    /// Build the lot summary for one item.
    pub fn item_lot_summary(&self, item_no: &str) -> ItemLotSummaryView {
        let key = normalize_key(item_no);

        let bin_rows = self
            .primary
            .bin_qty
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let history_rows = self
            .primary
            .lot_history_by_item
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let detail_rows = self
            .primary
            .lot_details_by_item
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        // Lot numbers in first-encountered order across the three sources.
        let mut lot_nos: Vec<String> = Vec::new();
        for row in bin_rows.iter().chain(history_rows).chain(detail_rows) {
            let lot_no = upper_field(row, lot::NO);
            if !lot_no.is_empty() && !lot_nos.contains(&lot_no) {
                lot_nos.push(lot_no);
            }
        }

        let mut lots: Vec<LotSummaryRow> = lot_nos
            .into_iter()
            .map(|lot_no| self.lot_summary_row(&key, lot_no))
            .collect();
        lots.sort_by_key(|row| std::cmp::Reverse(row.last_move.sort_key()));

        let serials: Vec<Record> = detail_rows
            .iter()
            .filter(|row| !upper_field(row, serial::NO).is_empty())
            .map(|row| (**row).clone())
            .collect();
        let history: Vec<Record> = history_rows.iter().map(|row| (**row).clone()).collect();

        let has_data = !lots.is_empty() || !serials.is_empty() || !history.is_empty();
        ItemLotSummaryView {
            item_no: key,
            lots,
            serials,
            history,
            has_data,
        }
    }

    fn lot_summary_row(&self, item_key: &str, lot_no: String) -> LotSummaryRow {
        // Lot-keyed rows can span items when lot numbering repeats across
        // items; keep only rows that carry this item or none at all.
        let matches_item = |row: &&Row| {
            let row_item = upper_field(row, item::NO);
            row_item.is_empty() || row_item == item_key
        };

        let bin_rows: Vec<Row> = self
            .primary
            .bin_qty_by_lot
            .get(&lot_no)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(matches_item)
            .cloned()
            .collect();
        let history_rows: Vec<Row> = self
            .primary
            .lot_history_by_lot
            .get(&lot_no)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(matches_item)
            .cloned()
            .collect();
        let detail_rows: Vec<Row> = self
            .primary
            .lot_details_by_lot
            .get(&lot_no)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(matches_item)
            .cloned()
            .collect();

        let bins = aggregate_bins(&bin_rows);
        let on_hand_qty = bins.iter().map(|bin| bin.quantity).sum();
        let expiry_date = detail_rows
            .iter()
            .map(|row| date_field(row, lot::EXPIRY))
            .find(|date| !date.is_empty())
            .unwrap_or_default();
        let serial_count = detail_rows
            .iter()
            .filter(|row| !upper_field(row, serial::NO).is_empty())
            .count();

        LotSummaryRow {
            lot_no,
            on_hand_qty,
            bins,
            last_move: max_date(&history_rows),
            expiry_date,
            serial_count,
        }
    }
}
