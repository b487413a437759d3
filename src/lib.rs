//! # shopview
//!
//! Entity resolution, indexing, and read-only view building over ERP
//! shop-system export snapshots.
//!
//! A snapshot is one immutable point-in-time export: a JSON object mapping
//! dataset name to an array of flat records. Two independent exporters
//! produce overlapping data under incompatible schemas (verbose English
//! field names vs. abbreviated legacy codes); this crate reconciles the
//! variants through ordered field-alias tables, builds all cross-entity
//! lookup indexes in one pass per snapshot, and exposes denormalized view
//! objects for each domain entity.
//!
//! ```no_run
//! use shopview::{DataCatalog, Snapshot, SnapshotIndexes};
//!
//! # fn main() -> shopview::SnapshotResult<()> {
//! let snapshot = Snapshot::from_json_str(r#"{"Items": [{"Item No.": "A1", "Stock": "1,200.00"}]}"#)?;
//! let catalog = DataCatalog::new(&snapshot);
//! let indexes = SnapshotIndexes::build(&snapshot);
//!
//! if catalog.capabilities.has_items {
//!     if let Some(view) = indexes.item_view("A1") {
//!         println!("{} on hand: {}", view.item_no, view.stock.on_hand);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! This layer never mutates the snapshot and never fails on malformed data:
//! missing datasets resolve to empty slices, unparseable scalars coerce to
//! safe defaults, and unknown entity keys produce `None` or empty views.
//! A refreshed snapshot requires discarding the indexes and rebuilding.

pub mod catalog;
pub mod coerce;
pub mod error;
pub mod fields;
pub mod indexes;
pub mod snapshot;
pub mod views;

pub use catalog::{Capabilities, DataCatalog, DatasetStatus, ShadowAdvisory};
pub use coerce::DateValue;
pub use error::{SnapshotError, SnapshotResult};
pub use indexes::{SnapshotIndexes, StockSummary, TransactionIndexes, TxRecord, TxSource};
pub use snapshot::{Record, Row, Snapshot};
pub use views::{TransactionFilter, DEFAULT_SEARCH_LIMIT};
