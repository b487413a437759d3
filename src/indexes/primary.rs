//! Primary indexes: one pass per entity group over the snapshot
//!
//! All cross-entity lookups downstream are O(1) against these maps; nothing
//! after this pass re-scans a raw dataset array. Keys are trimmed,
//! uppercased identifiers. Duplicate detail rows are preserved as-is so the
//! view layer can aggregate them.

use std::collections::HashMap;

use serde::Serialize;

use crate::fields::{self, bom, item, lot, serial, supplier, upper_field};
use crate::fields::datasets;
use crate::snapshot::{Record, Row, Snapshot};

/// Precomputed per-item stock summary. `available` is floored at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockSummary {
    pub on_hand: f64,
    pub wip: f64,
    pub reserve: f64,
    pub on_order: f64,
    pub available: f64,
}

/// All per-entity maps built in the first indexing pass.
#[derive(Debug, Default)]
pub struct PrimaryIndexes {
    /// Item master rows by item number.
    pub items: HashMap<String, Row>,
    /// Alert-exporter item rows by item number. Consulted before the master
    /// by builders that want the fresher reorder data it carries.
    pub item_alerts: HashMap<String, Row>,

    pub mo_headers: HashMap<String, Row>,
    /// Detail rows per MO, duplicates preserved for later aggregation.
    pub mo_details: HashMap<String, Vec<Row>>,

    pub po_headers: HashMap<String, Row>,
    pub po_lines: HashMap<String, Vec<Row>>,

    /// BOM headers per parent item; several revisions may share a parent.
    pub bom_headers: HashMap<String, Vec<Row>>,
    pub bom_details: HashMap<String, Vec<Row>>,
    /// Reverse index: detail rows per component item ("where used").
    pub bom_where_used: HashMap<String, Vec<Row>>,

    /// Row arrays by item number, unaggregated; the view layer aggregates.
    pub location_qty: HashMap<String, Vec<Row>>,
    pub bin_qty: HashMap<String, Vec<Row>>,
    pub cost_history: HashMap<String, Vec<Row>>,

    /// Bin-quantity rows re-keyed for lot and serial resolution.
    pub bin_qty_by_lot: HashMap<String, Vec<Row>>,
    pub bin_qty_by_serial: HashMap<String, Vec<Row>>,

    /// Lot/serial history log rows along three dimensions.
    pub lot_history_by_item: HashMap<String, Vec<Row>>,
    pub lot_history_by_lot: HashMap<String, Vec<Row>>,
    pub lot_history_by_serial: HashMap<String, Vec<Row>>,

    /// Lot/serial detail table rows (expiry, serial roster) by dimension.
    pub lot_details_by_item: HashMap<String, Vec<Row>>,
    pub lot_details_by_lot: HashMap<String, Vec<Row>>,
    pub lot_details_by_serial: HashMap<String, Vec<Row>>,

    pub suppliers: HashMap<String, Row>,

    /// Precomputed stock summary per item.
    pub stock_by_item: HashMap<String, StockSummary>,
}

impl PrimaryIndexes {
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut idx = PrimaryIndexes::default();

        for row in snapshot.dataset(datasets::ITEMS) {
            let key = upper_field(row, item::NO);
            if key.is_empty() {
                continue;
            }
            idx.stock_by_item
                .entry(key.clone())
                .or_insert_with(|| stock_summary(row));
            idx.items.entry(key).or_insert_with(|| row.clone());
        }

        index_unique(
            &mut idx.item_alerts,
            snapshot.dataset(datasets::ITEM_ALERTS),
            item::NO,
        );

        index_unique(
            &mut idx.mo_headers,
            snapshot.dataset(datasets::MO_HEADERS),
            fields::mo::NO,
        );
        index_multi(
            &mut idx.mo_details,
            snapshot.dataset(datasets::MO_DETAILS),
            fields::mo::NO,
        );

        index_unique(
            &mut idx.po_headers,
            snapshot.dataset(datasets::PO_HEADERS),
            fields::po::NO,
        );
        index_multi(
            &mut idx.po_lines,
            snapshot.dataset(datasets::PO_LINES),
            fields::po::NO,
        );

        index_multi(
            &mut idx.bom_headers,
            snapshot.dataset(datasets::BOM_HEADERS),
            bom::PARENT,
        );
        // One pass over BOM details feeds both the forward map and the
        // where-used reverse map.
        for row in snapshot.dataset(datasets::BOM_DETAILS) {
            let parent = upper_field(row, bom::PARENT);
            if !parent.is_empty() {
                idx.bom_details.entry(parent).or_default().push(row.clone());
            }
            let component = upper_field(row, bom::COMPONENT);
            if !component.is_empty() {
                idx.bom_where_used
                    .entry(component)
                    .or_default()
                    .push(row.clone());
            }
        }

        index_multi(
            &mut idx.location_qty,
            snapshot.dataset(datasets::LOCATION_QTY),
            item::NO,
        );

        for row in snapshot.dataset(datasets::BIN_QTY) {
            let item_key = upper_field(row, item::NO);
            if !item_key.is_empty() {
                idx.bin_qty.entry(item_key).or_default().push(row.clone());
            }
            let lot_key = upper_field(row, lot::NO);
            if !lot_key.is_empty() {
                idx.bin_qty_by_lot
                    .entry(lot_key)
                    .or_default()
                    .push(row.clone());
            }
            let serial_key = upper_field(row, serial::NO);
            if !serial_key.is_empty() {
                idx.bin_qty_by_serial
                    .entry(serial_key)
                    .or_default()
                    .push(row.clone());
            }
        }

        for row in snapshot.dataset(datasets::LOT_HISTORY) {
            push_by_dimensions(
                row,
                &mut idx.lot_history_by_item,
                &mut idx.lot_history_by_lot,
                &mut idx.lot_history_by_serial,
            );
        }

        for row in snapshot.dataset(datasets::LOT_DETAILS) {
            push_by_dimensions(
                row,
                &mut idx.lot_details_by_item,
                &mut idx.lot_details_by_lot,
                &mut idx.lot_details_by_serial,
            );
        }

        index_multi(
            &mut idx.cost_history,
            snapshot.dataset(datasets::COST_HISTORY),
            item::NO,
        );

        index_unique(
            &mut idx.suppliers,
            snapshot.dataset(datasets::SUPPLIERS),
            supplier::NO,
        );

        tracing::debug!(
            "primary indexes built: {} items, {} MO headers, {} PO headers, {} BOM parents, {} suppliers, {} lots",
            idx.items.len(),
            idx.mo_headers.len(),
            idx.po_headers.len(),
            idx.bom_headers.len(),
            idx.suppliers.len(),
            idx.lot_history_by_lot.len(),
        );
        idx
    }

    /// Available stock for an item, zero when the item is unknown.
    pub fn available_stock(&self, item_key: &str) -> f64 {
        self.stock_by_item
            .get(item_key)
            .map(|s| s.available)
            .unwrap_or(0.0)
    }
}

fn stock_summary(row: &Record) -> StockSummary {
    let on_hand = fields::num_field(row, item::ON_HAND);
    let reserve = fields::num_field(row, item::RESERVE);
    StockSummary {
        on_hand,
        wip: fields::num_field(row, item::WIP),
        reserve,
        on_order: fields::num_field(row, item::ON_ORDER),
        available: (on_hand - reserve).max(0.0),
    }
}

/// Index rows into a unique map; the first row per key wins.
fn index_unique(target: &mut HashMap<String, Row>, rows: &[Row], key_aliases: &[&str]) {
    for row in rows {
        let key = upper_field(row, key_aliases);
        if key.is_empty() {
            continue;
        }
        target.entry(key).or_insert_with(|| row.clone());
    }
}

/// Index rows into arrays per key, preserving duplicates and source order.
fn index_multi(target: &mut HashMap<String, Vec<Row>>, rows: &[Row], key_aliases: &[&str]) {
    for row in rows {
        let key = upper_field(row, key_aliases);
        if key.is_empty() {
            continue;
        }
        target.entry(key).or_default().push(row.clone());
    }
}

/// Push one lot/serial-shaped row into the item, lot, and serial maps for
/// whichever of those keys it carries.
fn push_by_dimensions(
    row: &Row,
    by_item: &mut HashMap<String, Vec<Row>>,
    by_lot: &mut HashMap<String, Vec<Row>>,
    by_serial: &mut HashMap<String, Vec<Row>>,
) {
    let item_key = upper_field(row, item::NO);
    if !item_key.is_empty() {
        by_item.entry(item_key).or_default().push(row.clone());
    }
    let lot_key = upper_field(row, lot::NO);
    if !lot_key.is_empty() {
        by_lot.entry(lot_key).or_default().push(row.clone());
    }
    let serial_key = upper_field(row, serial::NO);
    if !serial_key.is_empty() {
        by_serial.entry(serial_key).or_default().push(row.clone());
    }
}
