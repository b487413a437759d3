//! Transaction indexes: normalization of the two log sources
//!
//! The inventory transaction log and the legacy activity log are
//! structurally different exports of the same kind of event. Both are
//! normalized into one `TxRecord` shape, tagged by source, and indexed
//! along five dimensions. Bucket insertion order is the source iteration
//! order; only the global list is sorted date-descending.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::coerce::DateValue;
use crate::fields::{date_field, item, lot, mo, num_field, po, serial, str_field, tx, upper_field};
use crate::fields::datasets;
use crate::snapshot::{Record, Snapshot};

/// Which export table a normalized transaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxSource {
    InventoryLog,
    ActivityLog,
}

impl TxSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxSource::InventoryLog => "inventory_log",
            TxSource::ActivityLog => "activity_log",
        }
    }
}

/// One normalized transaction-log entry.
#[derive(Debug, Clone, Serialize)]
pub struct TxRecord {
    pub date: DateValue,
    pub tx_type: String,
    pub item_no: String,
    pub quantity: f64,
    pub unit: String,
    pub location: String,
    pub bin: String,
    pub lot_no: String,
    pub serial_no: String,
    /// Document reference: MO number, else PO, else Job, else Work Order.
    pub reference: String,
    pub user: String,
    pub cost: f64,
    pub source: TxSource,
}

/// The second indexing pass: one unified record shape, five buckets, and a
/// date-descending global list.
#[derive(Debug, Default)]
pub struct TransactionIndexes {
    /// Every normalized transaction, sorted date-descending. Unparseable
    /// dates sort to the tail.
    pub all: Vec<Arc<TxRecord>>,
    pub by_item: HashMap<String, Vec<Arc<TxRecord>>>,
    pub by_reference: HashMap<String, Vec<Arc<TxRecord>>>,
    pub by_lot: HashMap<String, Vec<Arc<TxRecord>>>,
    pub by_serial: HashMap<String, Vec<Arc<TxRecord>>>,
    /// Day buckets (`"20240115"`) for coarse date-range pruning.
    pub by_day: HashMap<String, Vec<Arc<TxRecord>>>,
}

impl TransactionIndexes {
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut idx = TransactionIndexes::default();

        for row in snapshot.dataset(datasets::TX_LOG) {
            idx.insert(normalize(row, TxSource::InventoryLog));
        }
        for row in snapshot.dataset(datasets::ACTIVITY_LOG) {
            idx.insert(normalize(row, TxSource::ActivityLog));
        }

        // Stable sort: rows sharing a date keep source order.
        idx.all.sort_by_key(|tx| Reverse(tx.date.sort_key()));

        tracing::debug!(
            "transaction indexes built: {} records, {} items, {} references, {} lots, {} serials, {} day buckets",
            idx.all.len(),
            idx.by_item.len(),
            idx.by_reference.len(),
            idx.by_lot.len(),
            idx.by_serial.len(),
            idx.by_day.len(),
        );
        idx
    }

    fn insert(&mut self, record: TxRecord) {
        let record = Arc::new(record);
        if !record.item_no.is_empty() {
            self.by_item
                .entry(record.item_no.clone())
                .or_default()
                .push(record.clone());
        }
        if !record.reference.is_empty() {
            self.by_reference
                .entry(record.reference.clone())
                .or_default()
                .push(record.clone());
        }
        if !record.lot_no.is_empty() {
            self.by_lot
                .entry(record.lot_no.clone())
                .or_default()
                .push(record.clone());
        }
        if !record.serial_no.is_empty() {
            self.by_serial
                .entry(record.serial_no.clone())
                .or_default()
                .push(record.clone());
        }
        let bucket = record.date.day_bucket();
        if !bucket.is_empty() {
            self.by_day.entry(bucket).or_default().push(record.clone());
        }
        self.all.push(record);
    }
}

/// Map one raw log row into the unified record shape. Field chains cover
/// both source schemas, so the same normalization serves both tables.
pub fn normalize(row: &Record, source: TxSource) -> TxRecord {
    // Document reference priority: MO, PO, Job, Work Order.
    let reference = [mo::NO, po::NO, tx::JOB_NO, tx::WO_NO]
        .into_iter()
        .map(|aliases| upper_field(row, aliases))
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default();

    TxRecord {
        date: date_field(row, tx::DATE),
        tx_type: str_field(row, tx::TYPE),
        item_no: upper_field(row, item::NO),
        quantity: num_field(row, tx::QTY),
        unit: str_field(row, tx::UNIT),
        location: str_field(row, tx::LOCATION),
        bin: str_field(row, tx::BIN),
        lot_no: upper_field(row, lot::NO),
        serial_no: upper_field(row, serial::NO),
        reference,
        user: str_field(row, tx::USER),
        cost: num_field(row, tx::COST),
        source,
    }
}
