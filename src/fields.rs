//! Field-alias tables and generic record accessors
//!
//! Two exporters produce overlapping datasets under incompatible schemas:
//! one uses verbose English field names (`"Mfg. Order No."`), the other
//! abbreviated legacy codes (`"MONO"`). This module is the only place those
//! differences are resolved. Every logical field is an ordered candidate-key
//! list consulted by a generic accessor; a new schema variant is accommodated
//! by extending a list here, never by changing a consumer.

use serde_json::Value;

use crate::coerce::{to_bool, to_date, to_num, to_str, to_upper, DateValue};
use crate::snapshot::Record;

/// Normalize an externally supplied entity key the same way index keys are
/// built: trimmed and uppercased.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}

/// Resolve a logical field against a record: the first candidate key that is
/// present with a non-null value wins. String values that trim to empty fall
/// through to later candidates; numeric zeros do not.
pub fn field<'a>(record: &'a Record, aliases: &[&str]) -> Option<&'a Value> {
    for key in aliases {
        match record.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.trim().is_empty() => continue,
            Some(value) => return Some(value),
        }
    }
    None
}

pub fn str_field(record: &Record, aliases: &[&str]) -> String {
    to_str(field(record, aliases))
}

pub fn upper_field(record: &Record, aliases: &[&str]) -> String {
    to_upper(field(record, aliases))
}

pub fn num_field(record: &Record, aliases: &[&str]) -> f64 {
    to_num(field(record, aliases))
}

pub fn date_field(record: &Record, aliases: &[&str]) -> DateValue {
    to_date(field(record, aliases))
}

pub fn bool_field(record: &Record, aliases: &[&str]) -> bool {
    to_bool(field(record, aliases))
}

// ============================================================================
// Logical field alias tables (verbose exporter first, legacy codes last)
// ============================================================================

pub mod item {
    pub const NO: &[&str] = &["Item No.", "Item", "ItemNo", "Item_No", "ITEMNO"];
    pub const DESCRIPTION: &[&str] = &["Description", "Item Description", "Desc", "DESCR"];
    pub const ON_HAND: &[&str] = &["Stock", "On Hand", "Qty On Hand", "OnHand", "QTYONHAND"];
    pub const WIP: &[&str] = &["WIP", "Qty WIP", "QtyWip", "QTYWIP"];
    pub const RESERVE: &[&str] = &["Reserve", "Reserved", "Qty Reserved", "QTYRESERVED"];
    pub const ON_ORDER: &[&str] = &["On Order", "Qty On Order", "OnOrder", "QTYONORDER"];
    pub const COST_AVERAGE: &[&str] = &["Average Cost", "Avg Cost", "AvgCost", "AVGCOST"];
    pub const COST_STANDARD: &[&str] = &["Standard Cost", "Std Cost", "StdCost", "STDCOST"];
    pub const COST_LAST: &[&str] = &["Last Cost", "LastCost", "LASTCOST"];
    pub const REORDER_LEVEL: &[&str] = &["Reorder Level", "ReorderLevel", "Min Stock", "REORDLEVEL"];
    pub const REORDER_QTY: &[&str] = &["Reorder Quantity", "Reorder Qty", "ReorderQty", "REORDQTY"];
    pub const UNIT: &[&str] = &["Stocking Unit", "Unit", "U/M", "UOM"];
}

pub mod mo {
    pub const NO: &[&str] = &["Mfg. Order No.", "MO No.", "MO", "MONO"];
    pub const ORDERED_QTY: &[&str] = &["Ordered", "Ordered Quantity", "Qty Ordered", "QTYORDERED"];
    pub const ORDER_DATE: &[&str] = &["Order Date", "OrderDate", "ORDDATE"];
    pub const DUE_DATE: &[&str] = &["Due Date", "Required Date", "DueDate", "DUEDATE"];
    pub const CUSTOMER: &[&str] = &["Customer", "Customer Name", "Cust", "CUSTNAME"];
    pub const BUILD_ITEM: &[&str] = &["Build Item No.", "Build Item", "Assembly Item", "BUILDITEM"];
    pub const STATUS: &[&str] = &["Status", "Order Status", "Stat", "STATUS"];
    pub const ON_HOLD: &[&str] = &["On Hold", "OnHold", "Hold", "ONHOLD"];
    pub const COMPONENT: &[&str] = &[
        "Component Item No.",
        "Component Item",
        "Component",
        "Item No.",
        "Item",
        "ITEMNO",
    ];
    pub const REQUIRED_QTY: &[&str] =
        &["Required Quantity", "Required", "Qty Required", "QTYREQUIRED"];
    pub const RELEASED_QTY: &[&str] =
        &["Released Quantity", "Released", "Qty Released", "QTYRELEASED"];
    pub const WIP_QTY: &[&str] = &["WIP Quantity", "WIP", "Qty WIP", "QTYWIP"];
    pub const RESERVED_QTY: &[&str] =
        &["Reserved Quantity", "Reserved", "Qty Reserved", "QTYRESERVED"];
    pub const COMPLETED_QTY: &[&str] =
        &["Completed Quantity", "Completed", "Qty Completed", "QTYCOMPLETED"];
    pub const UNIT_COST: &[&str] = &["Unit Cost", "Cost", "UNITCOST"];
    pub const SOURCE_LOCATION: &[&str] = &["Source Location", "Location", "Loc", "LOCATION"];
}

pub mod po {
    pub const NO: &[&str] = &["Purchase Order No.", "PO No.", "PO", "PONO"];
    pub const SUPPLIER_NO: &[&str] =
        &["Supplier No.", "Vendor No.", "Supplier", "Vendor", "SUPPNO"];
    pub const VENDOR_NAME: &[&str] = &["Vendor Name", "Supplier Name", "VENDNAME"];
    pub const ORDER_DATE: &[&str] = &["Order Date", "PO Date", "OrderDate", "ORDDATE"];
    pub const STATUS: &[&str] = &["Status", "Order Status", "STATUS"];
    pub const ORDERED_QTY: &[&str] = &["Ordered", "Order Qty", "Qty Ordered", "QTYORDERED"];
    pub const RECEIVED_QTY: &[&str] = &["Received", "Qty Received", "Received Qty", "QTYRECEIVED"];
    pub const UNIT_PRICE: &[&str] = &["Unit Price", "Price", "Unit Cost", "UNITPRICE"];
}

pub mod bom {
    pub const PARENT: &[&str] = &[
        "Parent Item No.",
        "Parent Item",
        "Parent",
        "Item No.",
        "ITEMNO",
    ];
    pub const REVISION: &[&str] = &["Revision", "Rev", "REV"];
    pub const COMPONENT: &[&str] = &[
        "Component Item No.",
        "Component Item",
        "Component",
        "COMPONENT",
    ];
    pub const QTY_PER: &[&str] = &["Quantity Per", "Qty Per", "QtyPer", "Required Quantity", "QTYPER"];
    pub const LEAD_TIME: &[&str] = &["Lead Time", "LeadTime", "LEADTIME"];
    pub const OPERATION: &[&str] = &["Operation", "Op", "OPERATION"];
    pub const COMMENT: &[&str] = &["Comment", "Comments", "Remarks", "COMMENT"];
}

pub mod lot {
    pub const NO: &[&str] = &["Lot No.", "Lot", "LotNo", "Lot_No", "LOTNO"];
    pub const EXPIRY: &[&str] = &["Expiry Date", "Expiration Date", "Exp Date", "EXPDATE"];
}

pub mod serial {
    pub const NO: &[&str] = &["Serial No.", "Serial", "SerialNo", "Serial_No", "SERIALNO"];
}

pub mod tx {
    pub const DATE: &[&str] = &["Date", "Transaction Date", "Trans Date", "TransDate", "TRANSDATE"];
    pub const TYPE: &[&str] = &["Type", "Transaction Type", "Trans Type", "TransType", "TRANSTYPE"];
    pub const QTY: &[&str] = &["Quantity", "Qty", "QUANTITY"];
    pub const UNIT: &[&str] = &["Unit", "U/M", "UOM", "Stocking Unit"];
    pub const LOCATION: &[&str] = &["Location", "Loc", "LOCATION"];
    pub const BIN: &[&str] = &["Bin", "Bin No.", "BinNo", "BIN"];
    pub const USER: &[&str] = &["User", "User ID", "UserId", "USERID"];
    pub const COST: &[&str] = &["Cost", "Unit Cost", "Amount", "COST"];
    pub const JOB_NO: &[&str] = &["Job No.", "Job", "JOBNO"];
    pub const WO_NO: &[&str] = &["Work Order No.", "WO No.", "WO", "WONO"];
    pub const REFERENCE: &[&str] = &["Reference", "Ref", "Document No.", "DocNo", "DOCNO"];
}

pub mod supplier {
    pub const NO: &[&str] = &["Supplier No.", "SupplierNo", "Supplier", "Vendor No.", "SUPPNO"];
    pub const NAME: &[&str] = &["Name", "Supplier Name", "Vendor Name", "VENDNAME"];
    pub const DESCRIPTION: &[&str] = &["Description", "Desc", "DESCR"];
}

// ============================================================================
// Dataset-name alias groups (canonical source first, known shadows after)
// ============================================================================

pub mod datasets {
    pub const ITEMS: &[&str] = &["Items", "ITEMLIST"];
    pub const ITEM_ALERTS: &[&str] = &["ItemAlerts", "REORDERLIST"];
    pub const MO_HEADERS: &[&str] = &["MfgOrders", "MOMAST"];
    pub const MO_DETAILS: &[&str] = &["MfgOrderDetails", "MODETAIL"];
    pub const PO_HEADERS: &[&str] = &["PurchaseOrders", "POMAST"];
    pub const PO_LINES: &[&str] = &["PurchaseOrderDetails", "PODETAIL"];
    pub const BOM_HEADERS: &[&str] = &["BomHeaders", "BOMMAST"];
    pub const BOM_DETAILS: &[&str] = &["BomDetails", "BOMDETAIL"];
    pub const LOCATION_QTY: &[&str] = &["LocationQuantities", "LOCQTY"];
    pub const BIN_QTY: &[&str] = &["BinQuantities", "BINQTY"];
    pub const TX_LOG: &[&str] = &["InventoryLog", "INVLOG"];
    pub const ACTIVITY_LOG: &[&str] = &["ActivityLog", "ACTLOG"];
    pub const LOT_HISTORY: &[&str] = &["LotSerialHistory", "LOTHIST"];
    pub const LOT_DETAILS: &[&str] = &["LotSerialDetails", "LOTDETAIL"];
    pub const COST_HISTORY: &[&str] = &["CostHistory", "COSTHIST"];
    pub const SUPPLIERS: &[&str] = &["Suppliers", "VENDMAST"];

    /// Every known dataset group, labelled for catalog reporting.
    pub const GROUPS: &[(&str, &[&str])] = &[
        ("items", ITEMS),
        ("item alerts", ITEM_ALERTS),
        ("MO headers", MO_HEADERS),
        ("MO details", MO_DETAILS),
        ("PO headers", PO_HEADERS),
        ("PO lines", PO_LINES),
        ("BOM headers", BOM_HEADERS),
        ("BOM details", BOM_DETAILS),
        ("location quantities", LOCATION_QTY),
        ("bin quantities", BIN_QTY),
        ("inventory log", TX_LOG),
        ("activity log", ACTIVITY_LOG),
        ("lot/serial history", LOT_HISTORY),
        ("lot/serial details", LOT_DETAILS),
        ("cost history", COST_HISTORY),
        ("suppliers", SUPPLIERS),
    ];
}
