//! Data catalog: dataset availability, capability flags, shadow advisories
//!
//! Consumers use the catalog to decide whether a screen should render "not
//! available" rather than an empty state. The indexes never consult it.

use serde::Serialize;

use crate::fields::datasets;
use crate::snapshot::Snapshot;

/// Presence and size of one dataset name.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatus {
    pub name: String,
    pub count: usize,
    pub available: bool,
}

/// Coarse capability flags, OR-ed across the known alias groups.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Capabilities {
    pub has_items: bool,
    pub has_mo: bool,
    pub has_po: bool,
    pub has_bom: bool,
    pub has_lot_trace: bool,
    pub has_transactions: bool,
}

/// Advisory raised when a canonical dataset masks a populated shadow source.
///
/// Two exporters can both emit the same entity under different names; the
/// accessor always routes to the canonical name, so a populated shadow is
/// surfaced here for diagnostics only, never merged.
#[derive(Debug, Clone, Serialize)]
pub struct ShadowAdvisory {
    pub group: String,
    pub canonical: String,
    pub shadow: String,
    pub canonical_rows: usize,
    pub shadow_rows: usize,
}

/// Per-snapshot dataset inventory.
#[derive(Debug, Clone, Serialize)]
pub struct DataCatalog {
    pub datasets: Vec<DatasetStatus>,
    pub capabilities: Capabilities,
    pub advisories: Vec<ShadowAdvisory>,
}

impl DataCatalog {
    pub fn new(snapshot: &Snapshot) -> Self {
        let mut statuses = Vec::new();
        let mut seen: Vec<&str> = Vec::new();

        for (_, keys) in datasets::GROUPS {
            for name in *keys {
                seen.push(name);
                let count = snapshot.row_count(name).unwrap_or(0);
                statuses.push(DatasetStatus {
                    name: (*name).to_string(),
                    count,
                    available: count > 0,
                });
            }
        }

        // Names the export carried beyond the fixed registry.
        let mut extras: Vec<&str> = snapshot
            .names()
            .filter(|name| !seen.contains(name))
            .collect();
        extras.sort_unstable();
        for name in extras {
            let count = snapshot.row_count(name).unwrap_or(0);
            statuses.push(DatasetStatus {
                name: name.to_string(),
                count,
                available: count > 0,
            });
        }

        let capabilities = Capabilities {
            has_items: group_rows(snapshot, datasets::ITEMS) > 0
                || group_rows(snapshot, datasets::ITEM_ALERTS) > 0,
            has_mo: group_rows(snapshot, datasets::MO_HEADERS) > 0
                || group_rows(snapshot, datasets::MO_DETAILS) > 0,
            has_po: group_rows(snapshot, datasets::PO_HEADERS) > 0
                || group_rows(snapshot, datasets::PO_LINES) > 0,
            has_bom: group_rows(snapshot, datasets::BOM_HEADERS) > 0
                || group_rows(snapshot, datasets::BOM_DETAILS) > 0,
            has_lot_trace: group_rows(snapshot, datasets::LOT_HISTORY) > 0
                || group_rows(snapshot, datasets::LOT_DETAILS) > 0,
            has_transactions: group_rows(snapshot, datasets::TX_LOG) > 0
                || group_rows(snapshot, datasets::ACTIVITY_LOG) > 0,
        };

        let advisories = detect_shadows(snapshot);

        DataCatalog {
            datasets: statuses,
            capabilities,
            advisories,
        }
    }

    /// Availability of one exact dataset name.
    pub fn is_available(&self, name: &str) -> bool {
        self.datasets
            .iter()
            .any(|status| status.name == name && status.available)
    }
}

fn group_rows(snapshot: &Snapshot, keys: &[&str]) -> usize {
    keys.iter()
        .map(|name| snapshot.row_count(name).unwrap_or(0))
        .sum()
}

fn detect_shadows(snapshot: &Snapshot) -> Vec<ShadowAdvisory> {
    let mut advisories = Vec::new();
    for (label, keys) in datasets::GROUPS {
        let canonical = keys[0];
        if !snapshot.contains(canonical) {
            continue;
        }
        let canonical_rows = snapshot.row_count(canonical).unwrap_or(0);
        for shadow in &keys[1..] {
            let shadow_rows = snapshot.row_count(shadow).unwrap_or(0);
            if shadow_rows == 0 {
                continue;
            }
            tracing::warn!(
                "dataset '{}' shadows '{}' for {} ({} rows masked by {} canonical rows)",
                canonical,
                shadow,
                label,
                shadow_rows,
                canonical_rows
            );
            advisories.push(ShadowAdvisory {
                group: (*label).to_string(),
                canonical: canonical.to_string(),
                shadow: (*shadow).to_string(),
                canonical_rows,
                shadow_rows,
            });
        }
    }
    advisories
}
