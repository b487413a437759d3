//! View builders: one denormalized, UI-ready object per entity
//!
//! Each builder is a read-only method on [`crate::indexes::SnapshotIndexes`].
//! Entity views
//! (item, MO, BOM, PO) return `None` for unknown keys; list-shaped views
//! (lot/serial traces, lot summaries, transaction search) return an empty
//! view carrying `has_data: false`. No builder fails on malformed data.

pub mod bom;
pub mod item;
pub mod item_lots;
pub mod lot;
pub mod mo;
pub mod po;
pub mod serial;
pub mod transactions;

pub use bom::{BomComponent, BomView, WhereUsedRef};
pub use item::{BinStock, CostEntry, HistoryEntry, HistorySource, ItemView, LocationStock};
pub use item_lots::{ItemLotSummaryView, LotSummaryRow};
pub use lot::{LotBinQuantity, LotMovement, LotTraceView};
pub use mo::{MoComponent, MoView};
pub use po::{PoLine, PoView};
pub use serial::SerialTraceView;
pub use transactions::{TransactionFilter, TransactionSearchView, DEFAULT_SEARCH_LIMIT};
