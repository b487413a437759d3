//! Item view: master fields merged with stock, cost, and history data

use std::collections::HashMap;

use serde::Serialize;

use crate::coerce::DateValue;
use crate::fields::{
    date_field, field, item, lot, normalize_key, num_field, serial, str_field, tx, upper_field,
};
use crate::indexes::{SnapshotIndexes, StockSummary, TxRecord};
use crate::snapshot::Record;

/// Complete item view for one item number.
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub item_no: String,
    pub description: String,
    pub unit: String,
    pub unit_cost: f64,
    pub reorder_level: f64,
    pub reorder_qty: f64,
    pub stock: StockSummary,
    /// Most recent row per location from the location-quantity table.
    pub locations: Vec<LocationStock>,
    /// Raw bin-quantity rows, unaggregated.
    pub bins: Vec<BinStock>,
    /// Transactions for this item, date-descending.
    pub transactions: Vec<TxRecord>,
    /// Cost history, date-descending.
    pub cost_history: Vec<CostEntry>,
    pub lot_history_count: usize,
    /// Merged feed interleaving the transaction log and the lot/serial
    /// history log, each entry tagged by source, date-descending.
    pub history: Vec<HistoryEntry>,
}

/// Latest known quantity at one location.
#[derive(Debug, Serialize)]
pub struct LocationStock {
    pub location: String,
    pub quantity: f64,
    pub as_of: DateValue,
}

/// One bin-quantity row.
#[derive(Debug, Serialize)]
pub struct BinStock {
    pub location: String,
    pub bin: String,
    pub lot_no: String,
    pub serial_no: String,
    pub quantity: f64,
}

/// One cost-history row.
#[derive(Debug, Serialize)]
pub struct CostEntry {
    pub date: DateValue,
    pub cost: f64,
    pub supplier_no: String,
    pub reference: String,
}

/// Which log a merged history entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySource {
    Transaction,
    LotHistory,
}

/// One entry in the merged item history feed.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub source: HistorySource,
    pub date: DateValue,
    pub entry_type: String,
    pub quantity: f64,
    pub location: String,
    pub bin: String,
    pub lot_no: String,
    pub serial_no: String,
    pub reference: String,
    pub user: String,
}

impl SnapshotIndexes {
    /// Build the item view for one item number, or `None` when the item
    /// appears in neither the master nor the alert export.
    pub fn item_view(&self, item_no: &str) -> Option<ItemView> {
        let key = normalize_key(item_no);
        let master = self.primary.items.get(&key);
        let alert = self.primary.item_alerts.get(&key);
        let row = master.or(alert)?;

        // The alert exporter carries fresher reorder data, so it wins for
        // those fields when present.
        let reorder_row = alert.unwrap_or(row);

        let mut description = str_field(row, item::DESCRIPTION);
        if description.is_empty() {
            if let Some(alert_row) = alert {
                description = str_field(alert_row, item::DESCRIPTION);
            }
        }

        let transactions: Vec<TxRecord> = self
            .transactions
            .by_item
            .get(&key)
            .map(|bucket| {
                let mut rows: Vec<TxRecord> = bucket.iter().map(|tx| (**tx).clone()).collect();
                rows.sort_by_key(|tx| std::cmp::Reverse(tx.date.sort_key()));
                rows
            })
            .unwrap_or_default();

        let lot_history = self
            .primary
            .lot_history_by_item
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut history: Vec<HistoryEntry> = transactions
            .iter()
            .map(|tx| HistoryEntry {
                source: HistorySource::Transaction,
                date: tx.date.clone(),
                entry_type: tx.tx_type.clone(),
                quantity: tx.quantity,
                location: tx.location.clone(),
                bin: tx.bin.clone(),
                lot_no: tx.lot_no.clone(),
                serial_no: tx.serial_no.clone(),
                reference: tx.reference.clone(),
                user: tx.user.clone(),
            })
            .collect();
        history.extend(lot_history.iter().map(|row| HistoryEntry {
            source: HistorySource::LotHistory,
            date: date_field(row, tx::DATE),
            entry_type: str_field(row, tx::TYPE),
            quantity: num_field(row, tx::QTY),
            location: str_field(row, tx::LOCATION),
            bin: str_field(row, tx::BIN),
            lot_no: upper_field(row, lot::NO),
            serial_no: upper_field(row, serial::NO),
            reference: str_field(row, tx::REFERENCE),
            user: str_field(row, tx::USER),
        }));
        history.sort_by_key(|entry| std::cmp::Reverse(entry.date.sort_key()));

        let mut cost_history: Vec<CostEntry> = self
            .primary
            .cost_history
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|row| CostEntry {
                date: date_field(row, tx::DATE),
                cost: num_field(row, tx::COST),
                supplier_no: upper_field(row, crate::fields::supplier::NO),
                reference: str_field(row, tx::REFERENCE),
            })
            .collect();
        cost_history.sort_by_key(|entry| std::cmp::Reverse(entry.date.sort_key()));

        Some(ItemView {
            item_no: key.clone(),
            description,
            unit: str_field(row, item::UNIT),
            unit_cost: resolve_unit_cost(row),
            reorder_level: num_field(reorder_row, item::REORDER_LEVEL),
            reorder_qty: num_field(reorder_row, item::REORDER_QTY),
            stock: self.primary.stock_by_item.get(&key).cloned().unwrap_or_default(),
            locations: latest_per_location(
                self.primary
                    .location_qty
                    .get(&key)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
            ),
            bins: self
                .primary
                .bin_qty
                .get(&key)
                .map(Vec::as_slice)
                .unwrap_or(&[])
                .iter()
                .map(|row| BinStock {
                    location: str_field(row, tx::LOCATION),
                    bin: str_field(row, tx::BIN),
                    lot_no: upper_field(row, lot::NO),
                    serial_no: upper_field(row, serial::NO),
                    quantity: num_field(row, tx::QTY),
                })
                .collect(),
            transactions,
            cost_history,
            lot_history_count: lot_history.len(),
            history,
        })
    }
}

/// Resolve the three item cost fields in priority order: average, then
/// standard, then last. The first chain present on the record wins, even
/// when its value is zero.
pub(crate) fn resolve_unit_cost(row: &Record) -> f64 {
    for aliases in [item::COST_AVERAGE, item::COST_STANDARD, item::COST_LAST] {
        if let Some(value) = field(row, aliases) {
            return crate::coerce::to_num(Some(value));
        }
    }
    0.0
}

/// Collapse location-quantity rows to the most recent row per location.
fn latest_per_location(rows: &[crate::snapshot::Row]) -> Vec<LocationStock> {
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, LocationStock> = HashMap::new();
    for row in rows {
        let location = str_field(row, tx::LOCATION);
        if location.is_empty() {
            continue;
        }
        let entry = LocationStock {
            location: location.clone(),
            quantity: num_field(row, tx::QTY),
            as_of: date_field(row, tx::DATE),
        };
        match latest.get(&location) {
            Some(existing) if existing.as_of.sort_key() >= entry.as_of.sort_key() => {}
            Some(_) => {
                latest.insert(location, entry);
            }
            None => {
                order.push(location.clone());
                latest.insert(location, entry);
            }
        }
    }
    order
        .into_iter()
        .filter_map(|location| latest.remove(&location))
        .collect()
}
