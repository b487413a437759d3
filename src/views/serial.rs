//! Serial trace view: master record, current location, movement timeline

use serde::Serialize;

use crate::fields::{item, lot, normalize_key, str_field, tx, upper_field};
use crate::indexes::SnapshotIndexes;
use crate::views::lot::{movement_from_row, LotMovement};

/// Trace view for one serial number. Degrades to empty fields with
/// `has_data: false` when the serial appears in no source table.
#[derive(Debug, Serialize)]
pub struct SerialTraceView {
    pub serial_no: String,
    pub item_no: String,
    pub description: String,
    pub lot_no: String,
    /// Current location and bin from the bin-quantity snapshot table.
    pub location: String,
    pub bin: String,
    /// Movement history, date-descending.
    pub movements: Vec<LotMovement>,
    pub has_data: bool,
}

impl SnapshotIndexes {
    /// Build the trace view for one serial number.
    pub fn serial_view(&self, serial_no: &str) -> SerialTraceView {
        let key = normalize_key(serial_no);

        let details = self
            .primary
            .lot_details_by_serial
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let history = self
            .primary
            .lot_history_by_serial
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let bin_rows = self
            .primary
            .bin_qty_by_serial
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
        let lot_no = master.map(|row| upper_field(row, lot::NO)).unwrap_or_default();

        // A serial occupies at most one bin; the first snapshot row wins.
        let (location, bin) = bin_rows
            .first()
            .map(|row| (str_field(row, tx::LOCATION), str_field(row, tx::BIN)))
            .unwrap_or_default();

        let mut movements: Vec<LotMovement> = history.iter().map(movement_from_row).collect();
        movements.sort_by_key(|movement| std::cmp::Reverse(movement.date.sort_key()));

        SerialTraceView {
            serial_no: key,
            item_no,
            description,
            lot_no,
            location,
            bin,
            movements,
            has_data,
        }
    }
}
