//! Lot trace view: master record, movement timeline, quantity by bin

use serde::Serialize;

use crate::coerce::DateValue;
use crate::fields::{date_field, item, lot, normalize_key, num_field, str_field, tx, upper_field};
use crate::indexes::SnapshotIndexes;
use crate::snapshot::Row;

/// Aggregated on-hand quantity at one (location, bin) pair.
#[derive(Debug, Clone, Serialize)]
pub struct LotBinQuantity {
    pub location: String,
    pub bin: String,
    pub quantity: f64,
}

/// One movement from the lot/serial history log.
#[derive(Debug, Serialize)]
pub struct LotMovement {
    pub date: DateValue,
    pub movement_type: String,
    pub quantity: f64,
    pub location: String,
    pub bin: String,
    pub reference: String,
    pub user: String,
}

/// Trace view for one lot number. Degrades to empty fields with
/// `has_data: false` when the lot appears in no source table.
#[derive(Debug, Serialize)]
pub struct LotTraceView {
    pub lot_no: String,
    pub item_no: String,
    pub description: String,
    pub expiry_date: DateValue,
    pub last_move: DateValue,
    pub on_hand_qty: f64,
    /// On-hand quantity aggregated by (location, bin).
    pub bins: Vec<LotBinQuantity>,
    /// Movement history, date-descending.
    pub movements: Vec<LotMovement>,
    pub has_data: bool,
}

impl SnapshotIndexes {
    /// Build the trace view for one lot number. The master record comes
    /// from whichever source table carries the lot; absent optional tables
    /// degrade to empty fields rather than failing.
    pub fn lot_view(&self, lot_no: &str) -> LotTraceView {
        let key = normalize_key(lot_no);

        let details = self
            .primary
            .lot_details_by_lot
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let history = self
            .primary
            .lot_history_by_lot
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let bin_rows = self
            .primary
            .bin_qty_by_lot
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let master = details.first().or_else(|| history.first()).or_else(|| bin_rows.first());
        let has_data = master.is_some();

        let item_no = master.map(|row| upper_field(row, item::NO)).unwrap_or_default();
        let description = self
            .primary
            .items
            .get(&item_no)
            .map(|row| str_field(row, item::DESCRIPTION))
            .unwrap_or_default();
        let expiry_date = details
            .iter()
            .map(|row| date_field(row, lot::EXPIRY))
            .find(|date| !date.is_empty())
            .unwrap_or_default();

        let mut movements: Vec<LotMovement> = history.iter().map(movement_from_row).collect();
        movements.sort_by_key(|movement| std::cmp::Reverse(movement.date.sort_key()));

        let last_move = max_date(history);
        let bins = aggregate_bins(bin_rows);
        let on_hand_qty = bins.iter().map(|bin| bin.quantity).sum();

        LotTraceView {
            lot_no: key,
            item_no,
            description,
            expiry_date,
            last_move,
            on_hand_qty,
            bins,
            movements,
            has_data,
        }
    }
}

pub(crate) fn movement_from_row(row: &Row) -> LotMovement {
    LotMovement {
        date: date_field(row, tx::DATE),
        movement_type: str_field(row, tx::TYPE),
        quantity: num_field(row, tx::QTY),
        location: str_field(row, tx::LOCATION),
        bin: str_field(row, tx::BIN),
        reference: str_field(row, tx::REFERENCE),
        user: str_field(row, tx::USER),
    }
}

/// Group bin-quantity rows by (location, bin), summing quantities and
/// keeping first-encountered order.
pub(crate) fn aggregate_bins(rows: &[Row]) -> Vec<LotBinQuantity> {
    let mut bins: Vec<LotBinQuantity> = Vec::new();
    for row in rows {
        let location = str_field(row, tx::LOCATION);
        let bin = str_field(row, tx::BIN);
        let quantity = num_field(row, tx::QTY);
        match bins
            .iter_mut()
            .find(|entry| entry.location == location && entry.bin == bin)
        {
            Some(entry) => entry.quantity += quantity,
            None => bins.push(LotBinQuantity {
                location,
                bin,
                quantity,
            }),
        }
    }
    bins
}

/// The latest date across history rows. Ties, including raw-only history,
/// keep the first row encountered.
pub(crate) fn max_date(rows: &[Row]) -> DateValue {
    let mut best: Option<DateValue> = None;
    for row in rows {
        let date = date_field(row, tx::DATE);
        if best
            .as_ref()
            .map_or(true, |current| date.sort_key() > current.sort_key())
        {
            best = Some(date);
        }
    }
    best.unwrap_or_default()
}
