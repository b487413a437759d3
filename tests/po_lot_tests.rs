//! Purchase order and lot/serial trace view tests
//!
//! Covers line totals, the vendor-name fallback chain, bin aggregation,
//! movement ordering, and graceful degradation when source tables are
//! missing from the export.

use serde_json::{json, Value};
use shopview::{Snapshot, SnapshotIndexes};

fn indexes(payload: Value) -> SnapshotIndexes {
    let snap = Snapshot::from_value(payload).expect("snapshot payload must be an object");
    SnapshotIndexes::build(&snap)
}

// ============================================================================
// PO View Tests
// ============================================================================

#[cfg(test)]
mod po_tests {
    use super::*;

    #[test]
    fn test_line_totals_and_extended_price() {
        let idx = indexes(json!({
            "PurchaseOrders": [{"Purchase Order No.": "PO-500", "Status": "Open"}],
            "PurchaseOrderDetails": [
                {"Purchase Order No.": "PO-500", "Item No.": "A1", "Ordered": 10, "Received": 4, "Unit Price": "$2.50"},
                {"Purchase Order No.": "PO-500", "Item No.": "B2", "Ordered": 3, "Received": 3, "Unit Price": 10.0}
            ]
        }));
        let view = idx.po_view("po-500").unwrap();
        assert_eq!(view.po_no, "PO-500");
        assert_eq!(view.status, "Open");
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].extended_price, 25.0);
        assert_eq!(view.lines[1].extended_price, 30.0);
        assert_eq!(view.total_ordered, 13.0);
        assert_eq!(view.total_received, 7.0);
        assert_eq!(view.total_value, 55.0);
    }

    #[test]
    fn test_line_description_prefers_item_master() {
        let idx = indexes(json!({
            "Items": [{"Item No.": "A1", "Description": "Hex Bolt"}],
            "PurchaseOrderDetails": [
                {"Purchase Order No.": "PO-500", "Item No.": "A1", "Description": "stale", "Ordered": 1},
                {"Purchase Order No.": "PO-500", "Item No.": "B2", "Description": "line-only", "Ordered": 1}
            ]
        }));
        let view = idx.po_view("PO-500").unwrap();
        assert_eq!(view.lines[0].description, "Hex Bolt");
        assert_eq!(view.lines[1].description, "line-only");
    }

    #[test]
    fn test_vendor_name_from_header_wins() {
        let idx = indexes(json!({
            "PurchaseOrders": [{"Purchase Order No.": "PO-500", "Supplier No.": "V100", "Vendor Name": "Embedded Name"}],
            "Suppliers": [{"Supplier No.": "V100", "Name": "Master Name"}]
        }));
        assert_eq!(idx.po_view("PO-500").unwrap().vendor_name, "Embedded Name");
    }

    #[test]
    fn test_vendor_name_falls_back_to_supplier_master() {
        let idx = indexes(json!({
            "PurchaseOrders": [{"Purchase Order No.": "PO-500", "Supplier No.": "V100"}],
            "Suppliers": [{"Supplier No.": "V100", "Name": "Master Name"}]
        }));
        assert_eq!(idx.po_view("PO-500").unwrap().vendor_name, "Master Name");
    }

    #[test]
    fn test_vendor_name_falls_back_to_supplier_description() {
        let idx = indexes(json!({
            "PurchaseOrders": [{"Purchase Order No.": "PO-500", "Supplier No.": "V100"}],
            "Suppliers": [{"Supplier No.": "V100", "Description": "Acme Fasteners Ltd"}]
        }));
        assert_eq!(idx.po_view("PO-500").unwrap().vendor_name, "Acme Fasteners Ltd");
    }

    #[test]
    fn test_embedded_vendor_name_survives_missing_master_row() {
        let idx = indexes(json!({
            "PurchaseOrders": [{"Purchase Order No.": "PO-500", "Supplier No.": "V999", "Vendor Name": "Orphan Vendor"}]
        }));
        let view = idx.po_view("PO-500").unwrap();
        assert_eq!(view.supplier_no, "V999");
        assert_eq!(view.vendor_name, "Orphan Vendor");
    }

    #[test]
    fn test_lines_only_order_resolves() {
        let idx = indexes(json!({
            "PurchaseOrderDetails": [
                {"Purchase Order No.": "PO-501", "Item No.": "A1", "Ordered": 2, "Unit Price": 5.0}
            ]
        }));
        let view = idx.po_view("PO-501").unwrap();
        assert_eq!(view.vendor_name, "");
        assert_eq!(view.total_value, 10.0);
    }

    #[test]
    fn test_unknown_order_returns_none() {
        let idx = indexes(json!({}));
        assert!(idx.po_view("PO-999").is_none());
    }
}

// ============================================================================
// Lot Trace Tests
// ============================================================================

#[cfg(test)]
mod lot_tests {
    use super::*;

    fn lot_payload() -> Value {
        json!({
            "Items": [{"Item No.": "A1", "Description": "Hex Bolt"}],
            "LotSerialDetails": [
                {"Item No.": "A1", "Lot No.": "L1", "Expiry Date": "2025-06-30"}
            ],
            "LotSerialHistory": [
                {"Item No.": "A1", "Lot No.": "L1", "Date": "2024-01-10", "Type": "Receive", "Quantity": 10, "Location": "MAIN"},
                {"Item No.": "A1", "Lot No.": "L1", "Date": "2024-02-20", "Type": "Move", "Quantity": 4, "Location": "AUX"}
            ],
            "BinQuantities": [
                {"Item No.": "A1", "Lot No.": "L1", "Location": "MAIN", "Bin": "B-01", "Quantity": 6},
                {"Item No.": "A1", "Lot No.": "L1", "Location": "MAIN", "Bin": "B-01", "Quantity": 2},
                {"Item No.": "A1", "Lot No.": "L1", "Location": "AUX", "Bin": "B-09", "Quantity": 4}
            ]
        })
    }

    #[test]
    fn test_bins_aggregated_by_location_and_bin() {
        let view = indexes(lot_payload()).lot_view("l1");
        assert!(view.has_data);
        assert_eq!(view.lot_no, "L1");
        assert_eq!(view.item_no, "A1");
        assert_eq!(view.description, "Hex Bolt");
        assert_eq!(view.bins.len(), 2);
        assert_eq!(view.bins[0].bin, "B-01");
        assert_eq!(view.bins[0].quantity, 8.0);
        assert_eq!(view.bins[1].quantity, 4.0);
        assert_eq!(view.on_hand_qty, 12.0);
    }

    #[test]
    fn test_movements_sorted_date_descending_with_last_move() {
        let view = indexes(lot_payload()).lot_view("L1");
        assert_eq!(view.movements.len(), 2);
        assert_eq!(view.movements[0].movement_type, "Move");
        assert_eq!(view.movements[1].movement_type, "Receive");
        assert_eq!(view.last_move, view.movements[0].date);
        assert!(view.expiry_date.is_parsed());
    }

    #[test]
    fn test_lot_known_only_from_bin_rows() {
        let idx = indexes(json!({
            "BinQuantities": [
                {"Item No.": "A1", "Lot No.": "L7", "Location": "MAIN", "Bin": "B-02", "Quantity": 3}
            ]
        }));
        let view = idx.lot_view("L7");
        assert!(view.has_data);
        assert_eq!(view.item_no, "A1");
        assert!(view.movements.is_empty());
        assert!(view.expiry_date.is_empty());
        assert_eq!(view.on_hand_qty, 3.0);
    }

    #[test]
    fn test_unknown_lot_degrades_to_empty_view() {
        let view = indexes(json!({})).lot_view("NOPE");
        assert!(!view.has_data);
        assert_eq!(view.item_no, "");
        assert!(view.bins.is_empty());
        assert!(view.movements.is_empty());
        assert_eq!(view.on_hand_qty, 0.0);
    }
}

// ============================================================================
// Serial Trace Tests
// ============================================================================

#[cfg(test)]
mod serial_tests {
    use super::*;

    #[test]
    fn test_current_location_from_bin_snapshot() {
        let idx = indexes(json!({
            "Items": [{"Item No.": "A1", "Description": "Hex Bolt"}],
            "LotSerialDetails": [
                {"Item No.": "A1", "Lot No.": "L1", "Serial No.": "S-100"}
            ],
            "LotSerialHistory": [
                {"Item No.": "A1", "Serial No.": "S-100", "Date": "2024-01-10", "Type": "Receive", "Quantity": 1},
                {"Item No.": "A1", "Serial No.": "S-100", "Date": "2024-03-01", "Type": "Move", "Quantity": 1}
            ],
            "BinQuantities": [
                {"Item No.": "A1", "Serial No.": "S-100", "Location": "MAIN", "Bin": "B-04", "Quantity": 1}
            ]
        }));
        let view = idx.serial_view("s-100");
        assert!(view.has_data);
        assert_eq!(view.serial_no, "S-100");
        assert_eq!(view.item_no, "A1");
        assert_eq!(view.description, "Hex Bolt");
        assert_eq!(view.lot_no, "L1");
        assert_eq!(view.location, "MAIN");
        assert_eq!(view.bin, "B-04");
        assert_eq!(view.movements[0].movement_type, "Move");
    }

    #[test]
    fn test_serial_known_only_from_history() {
        let idx = indexes(json!({
            "LotSerialHistory": [
                {"Item No.": "A1", "Serial No.": "S-200", "Date": "2024-01-10", "Type": "Issue", "Quantity": 1}
            ]
        }));
        let view = idx.serial_view("S-200");
        assert!(view.has_data);
        assert_eq!(view.location, "");
        assert_eq!(view.bin, "");
        assert_eq!(view.movements.len(), 1);
    }

    #[test]
    fn test_unknown_serial_degrades_to_empty_view() {
        let view = indexes(json!({})).serial_view("S-999");
        assert!(!view.has_data);
        assert!(view.movements.is_empty());
    }
}

// ============================================================================
// Item Lot Summary Tests
// ============================================================================

#[cfg(test)]
mod item_lots_tests {
    use super::*;

    #[test]
    fn test_lots_sorted_by_last_move_descending() {
        let idx = indexes(json!({
            "BinQuantities": [
                {"Item No.": "A1", "Lot No.": "L1", "Location": "MAIN", "Bin": "B-01", "Quantity": 5},
                {"Item No.": "A1", "Lot No.": "L2", "Location": "MAIN", "Bin": "B-02", "Quantity": 7}
            ],
            "LotSerialHistory": [
                {"Item No.": "A1", "Lot No.": "L1", "Date": "2024-01-10", "Quantity": 5},
                {"Item No.": "A1", "Lot No.": "L2", "Date": "2024-04-01", "Quantity": 7}
            ]
        }));
        let view = idx.item_lot_summary("A1");
        assert!(view.has_data);
        assert_eq!(view.lots.len(), 2);
        assert_eq!(view.lots[0].lot_no, "L2");
        assert_eq!(view.lots[0].on_hand_qty, 7.0);
        assert_eq!(view.lots[1].lot_no, "L1");
        assert_eq!(view.history.len(), 2);
    }

    #[test]
    fn test_serial_count_and_raw_feeds() {
        let idx = indexes(json!({
            "LotSerialDetails": [
                {"Item No.": "A1", "Lot No.": "L1", "Serial No.": "S1", "Expiry Date": "2025-06-30"},
                {"Item No.": "A1", "Lot No.": "L1", "Serial No.": "S2"},
                {"Item No.": "A1", "Lot No.": "L1"}
            ]
        }));
        let view = idx.item_lot_summary("A1");
        assert_eq!(view.lots.len(), 1);
        assert_eq!(view.lots[0].serial_count, 2);
        assert!(view.lots[0].expiry_date.is_parsed());
        // The raw serial feed drops the lot-level row without a serial.
        assert_eq!(view.serials.len(), 2);
    }

    #[test]
    fn test_shared_lot_number_excludes_other_items_rows() {
        let idx = indexes(json!({
            "BinQuantities": [
                {"Item No.": "A1", "Lot No.": "L1", "Location": "MAIN", "Bin": "B-01", "Quantity": 5},
                {"Item No.": "B2", "Lot No.": "L1", "Location": "MAIN", "Bin": "B-01", "Quantity": 99}
            ]
        }));
        let view = idx.item_lot_summary("A1");
        assert_eq!(view.lots.len(), 1);
        assert_eq!(view.lots[0].on_hand_qty, 5.0);
    }

    #[test]
    fn test_item_without_lot_data() {
        let idx = indexes(json!({"Items": [{"Item No.": "A1"}]}));
        let view = idx.item_lot_summary("A1");
        assert!(!view.has_data);
        assert!(view.lots.is_empty());
        assert!(view.serials.is_empty());
        assert!(view.history.is_empty());
    }
}
