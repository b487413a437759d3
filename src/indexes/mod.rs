//! Cross-entity index construction
//!
//! Both index passes run once per snapshot. The resulting bundle is
//! immutable; a refreshed snapshot means discarding it and building a new
//! one. View builders are read-only methods on the bundle, so a serving
//! layer can swap a rebuilt bundle in atomically behind an `Arc`.

pub mod primary;
pub mod transactions;

pub use primary::{PrimaryIndexes, StockSummary};
pub use transactions::{TransactionIndexes, TxRecord, TxSource};

use crate::snapshot::Snapshot;

/// Everything derived from one snapshot: the per-entity maps and the
/// normalized transaction indexes.
#[derive(Debug, Default)]
pub struct SnapshotIndexes {
    pub primary: PrimaryIndexes,
    pub transactions: TransactionIndexes,
}

impl SnapshotIndexes {
    /// Run both indexing passes over a snapshot. Must complete before any
    /// view builder is invoked against that snapshot's data; sequencing is
    /// the caller's responsibility.
    pub fn build(snapshot: &Snapshot) -> Self {
        Self {
            primary: PrimaryIndexes::build(snapshot),
            transactions: TransactionIndexes::build(snapshot),
        }
    }
}
