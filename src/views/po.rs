//! Purchase order view with supplier join and line totals

use serde::Serialize;

use crate::coerce::DateValue;
use crate::fields::{
    date_field, item, normalize_key, num_field, po, str_field, supplier, upper_field,
};
use crate::indexes::SnapshotIndexes;

/// Complete purchase order view.
#[derive(Debug, Serialize)]
pub struct PoView {
    pub po_no: String,
    pub supplier_no: String,
    /// Header vendor name, else supplier-master name, else supplier-master
    /// description.
    pub vendor_name: String,
    pub order_date: DateValue,
    pub status: String,
    pub lines: Vec<PoLine>,
    pub total_ordered: f64,
    pub total_received: f64,
    pub total_value: f64,
}

/// One purchase order line.
#[derive(Debug, Serialize)]
pub struct PoLine {
    pub item_no: String,
    pub description: String,
    pub ordered_qty: f64,
    pub received_qty: f64,
    pub unit_price: f64,
    /// `ordered_qty * unit_price`.
    pub extended_price: f64,
}

impl SnapshotIndexes {
    /// Build the PO view for one order number, or `None` when the order has
    /// neither a header nor lines.
    pub fn po_view(&self, po_no: &str) -> Option<PoView> {
        let key = normalize_key(po_no);
        let header = self.primary.po_headers.get(&key);
        let line_rows = self
            .primary
            .po_lines
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if header.is_none() && line_rows.is_empty() {
            return None;
        }

        let supplier_no = header
            .map(|h| upper_field(h, po::SUPPLIER_NO))
            .unwrap_or_default();
        let supplier_row = if supplier_no.is_empty() {
            None
        } else {
            self.primary.suppliers.get(&supplier_no)
        };

        let mut vendor_name = header
            .map(|h| str_field(h, po::VENDOR_NAME))
            .unwrap_or_default();
        if vendor_name.is_empty() {
            if let Some(row) = supplier_row {
                vendor_name = str_field(row, supplier::NAME);
                if vendor_name.is_empty() {
                    vendor_name = str_field(row, supplier::DESCRIPTION);
                }
            }
        }

        let lines: Vec<PoLine> = line_rows
            .iter()
            .map(|row| {
                let item_no = upper_field(row, item::NO);
                let description = self
                    .primary
                    .items
                    .get(&item_no)
                    .map(|master| str_field(master, item::DESCRIPTION))
                    .unwrap_or_else(|| str_field(row, item::DESCRIPTION));
                let ordered_qty = num_field(row, po::ORDERED_QTY);
                let unit_price = num_field(row, po::UNIT_PRICE);
                PoLine {
                    item_no,
                    description,
                    ordered_qty,
                    received_qty: num_field(row, po::RECEIVED_QTY),
                    unit_price,
                    extended_price: ordered_qty * unit_price,
                }
            })
            .collect();

        let total_ordered = lines.iter().map(|line| line.ordered_qty).sum();
        let total_received = lines.iter().map(|line| line.received_qty).sum();
        let total_value = lines.iter().map(|line| line.extended_price).sum();

        Some(PoView {
            po_no: key,
            supplier_no,
            vendor_name,
            order_date: header
                .map(|h| date_field(h, po::ORDER_DATE))
                .unwrap_or_default(),
            status: header.map(|h| str_field(h, po::STATUS)).unwrap_or_default(),
            lines,
            total_ordered,
            total_received,
            total_value,
        })
    }
}
