//! Transaction explorer: candidate-bucket search with secondary filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::normalize_key;
use crate::indexes::{SnapshotIndexes, TxRecord};

/// Default result cap when a filter does not specify one.
pub const DEFAULT_SEARCH_LIMIT: usize = 200;

/// Search filters. Exactly one of item / reference / lot / serial — in that
/// priority order — selects the candidate index bucket; the remaining
/// filters apply linearly over that candidate set. With none of the four,
/// the full date-sorted global list is the candidate set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub item_no: Option<String>,
    pub reference: Option<String>,
    pub lot_no: Option<String>,
    pub serial_no: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub bin: Option<String>,
    pub tx_type: Option<String>,
    pub limit: Option<usize>,
}

/// Search result. `records` is truncated to the limit; `total_count` is the
/// pre-truncation match count.
#[derive(Debug, Serialize)]
pub struct TransactionSearchView {
    pub records: Vec<TxRecord>,
    pub total_count: usize,
    pub has_data: bool,
}

impl SnapshotIndexes {
    /// Search the normalized transaction list. Candidate-set order is the
    /// bucket's source order (the global list is date-descending); results
    /// are not re-sorted.
    pub fn transaction_search(&self, filter: &TransactionFilter) -> TransactionSearchView {
        let tx = &self.transactions;
        let candidates = if let Some(key) = key_of(&filter.item_no) {
            bucket(&tx.by_item, &key)
        } else if let Some(key) = key_of(&filter.reference) {
            bucket(&tx.by_reference, &key)
        } else if let Some(key) = key_of(&filter.lot_no) {
            bucket(&tx.by_lot, &key)
        } else if let Some(key) = key_of(&filter.serial_no) {
            bucket(&tx.by_serial, &key)
        } else {
            tx.all.as_slice()
        };

        let limit = filter.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let mut records = Vec::new();
        let mut total_count = 0usize;
        for record in candidates {
            if !matches(filter, record) {
                continue;
            }
            total_count += 1;
            if records.len() < limit {
                records.push((**record).clone());
            }
        }

        TransactionSearchView {
            has_data: total_count > 0,
            total_count,
            records,
        }
    }
}

fn key_of(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(normalize_key)
        .filter(|key| !key.is_empty())
}

fn bucket<'a>(
    index: &'a std::collections::HashMap<String, Vec<std::sync::Arc<TxRecord>>>,
    key: &str,
) -> &'a [std::sync::Arc<TxRecord>] {
    index.get(key).map(Vec::as_slice).unwrap_or(&[])
}

/// Every supplied filter must match. Re-checking the field that selected
/// the candidate bucket is harmless since the whole bucket matches it.
fn matches(filter: &TransactionFilter, record: &TxRecord) -> bool {
    if let Some(key) = key_of(&filter.item_no) {
        if record.item_no != key {
            return false;
        }
    }
    if let Some(key) = key_of(&filter.reference) {
        if record.reference != key {
            return false;
        }
    }
    if let Some(key) = key_of(&filter.lot_no) {
        if record.lot_no != key {
            return false;
        }
    }
    if let Some(key) = key_of(&filter.serial_no) {
        if record.serial_no != key {
            return false;
        }
    }
    if let Some(from) = filter.date_from {
        if record.date.sort_key() < from.timestamp_millis() {
            return false;
        }
    }
    if let Some(to) = filter.date_to {
        if !record.date.is_parsed() || record.date.sort_key() > to.timestamp_millis() {
            return false;
        }
    }
    if let Some(location) = filter.location.as_deref() {
        if !record.location.trim().eq_ignore_ascii_case(location.trim()) {
            return false;
        }
    }
    if let Some(bin) = filter.bin.as_deref() {
        if !record.bin.trim().eq_ignore_ascii_case(bin.trim()) {
            return false;
        }
    }
    if let Some(tx_type) = filter.tx_type.as_deref() {
        if !record.tx_type.trim().eq_ignore_ascii_case(tx_type.trim()) {
            return false;
        }
    }
    true
}
