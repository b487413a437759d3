//! Bill of materials view and the where-used reverse lookup

use serde::Serialize;

use crate::fields::{bom, item, normalize_key, num_field, str_field, upper_field};
use crate::indexes::SnapshotIndexes;

/// BOM view for one (parent item, revision).
#[derive(Debug, Serialize)]
pub struct BomView {
    pub parent_item_no: String,
    /// The revision of the selected header; empty when only detail lines
    /// exist for the parent.
    pub revision: String,
    pub description: String,
    pub components: Vec<BomComponent>,
}

/// One BOM detail line.
#[derive(Debug, Serialize)]
pub struct BomComponent {
    pub item_no: String,
    pub description: String,
    pub quantity_per: f64,
    pub lead_time: f64,
    pub operation: String,
    pub source_location: String,
    pub comment: String,
}

/// One where-used reference: a product that consumes the component.
#[derive(Debug, Serialize)]
pub struct WhereUsedRef {
    pub parent_item_no: String,
    pub revision: String,
    pub quantity_per: f64,
}

impl SnapshotIndexes {
    /// Build the BOM view for one parent item. An explicit revision must
    /// match a header's revision field exactly; with no revision, the first
    /// header encountered for the parent is used. `None` when the parent
    /// has neither headers nor detail lines, or the requested revision does
    /// not exist.
    pub fn bom_view(&self, parent_item_no: &str, revision: Option<&str>) -> Option<BomView> {
        let key = normalize_key(parent_item_no);
        let headers = self
            .primary
            .bom_headers
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let details = self
            .primary
            .bom_details
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if headers.is_empty() && details.is_empty() {
            return None;
        }

        let header = match revision {
            Some(wanted) => {
                Some(headers.iter().find(|h| str_field(h, bom::REVISION) == wanted)?)
            }
            None => headers.first(),
        };

        let components = details
            .iter()
            .map(|row| {
                let item_no = upper_field(row, bom::COMPONENT);
                let description = self
                    .primary
                    .items
                    .get(&item_no)
                    .map(|master| str_field(master, item::DESCRIPTION))
                    .unwrap_or_default();
                BomComponent {
                    item_no,
                    description,
                    quantity_per: num_field(row, bom::QTY_PER),
                    lead_time: num_field(row, bom::LEAD_TIME),
                    operation: str_field(row, bom::OPERATION),
                    source_location: str_field(row, crate::fields::mo::SOURCE_LOCATION),
                    comment: str_field(row, bom::COMMENT),
                }
            })
            .collect();

        let description = header
            .map(|h| str_field(h, item::DESCRIPTION))
            .filter(|d| !d.is_empty())
            .or_else(|| {
                self.primary
                    .items
                    .get(&key)
                    .map(|master| str_field(master, item::DESCRIPTION))
            })
            .unwrap_or_default();

        Some(BomView {
            parent_item_no: key,
            revision: header.map(|h| str_field(h, bom::REVISION)).unwrap_or_default(),
            description,
            components,
        })
    }

    /// Every BOM detail line consuming the given component item, resolved
    /// through the reverse index. Empty when the component is used nowhere.
    pub fn where_used(&self, component_item_no: &str) -> Vec<WhereUsedRef> {
        self.primary
            .bom_where_used
            .get(&normalize_key(component_item_no))
            .map(|rows| {
                rows.iter()
                    .map(|row| WhereUsedRef {
                        parent_item_no: upper_field(row, bom::PARENT),
                        revision: str_field(row, bom::REVISION),
                        quantity_per: num_field(row, bom::QTY_PER),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
