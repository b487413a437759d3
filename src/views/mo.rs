//! Manufacturing order view with per-component aggregation

use std::collections::HashMap;

use serde::Serialize;

use crate::coerce::DateValue;
use crate::fields::{
    bool_field, date_field, item, mo, normalize_key, num_field, str_field, upper_field,
};
use crate::indexes::SnapshotIndexes;

/// Complete manufacturing order view.
#[derive(Debug, Serialize)]
pub struct MoView {
    pub mo_no: String,
    pub build_item_no: String,
    pub description: String,
    pub ordered_qty: f64,
    pub order_date: DateValue,
    pub due_date: DateValue,
    pub customer: String,
    pub status: String,
    pub on_hold: bool,
    /// One entry per component item; duplicate detail lines are summed.
    pub components: Vec<MoComponent>,
    pub total_cost: f64,
}

/// One required component, aggregated across duplicate detail lines.
#[derive(Debug, Serialize)]
pub struct MoComponent {
    pub item_no: String,
    pub description: String,
    pub required_qty: f64,
    pub released_qty: f64,
    pub wip_qty: f64,
    pub reserved_qty: f64,
    pub completed_qty: f64,
    /// Back-computed as `total_cost / required_qty` after aggregation.
    pub unit_cost: f64,
    pub total_cost: f64,
    pub available_stock: f64,
    /// `max(0, (required - released) - available_stock)`, computed after
    /// aggregation.
    pub shortage: f64,
    /// Differing source locations across lines, comma-joined.
    pub source_location: String,
}

impl SnapshotIndexes {
    /// Build the MO view for one order number, or `None` when the order has
    /// neither a header nor detail lines.
    pub fn mo_view(&self, mo_no: &str) -> Option<MoView> {
        let key = normalize_key(mo_no);
        let header = self.primary.mo_headers.get(&key);
        let details = self
            .primary
            .mo_details
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if header.is_none() && details.is_empty() {
            return None;
        }

        let mut components: Vec<MoComponent> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for row in details {
            let item_no = upper_field(row, mo::COMPONENT);
            if item_no.is_empty() {
                continue;
            }
            let index = *slots.entry(item_no.clone()).or_insert_with(|| {
                components.push(MoComponent {
                    item_no: item_no.clone(),
                    description: String::new(),
                    required_qty: 0.0,
                    released_qty: 0.0,
                    wip_qty: 0.0,
                    reserved_qty: 0.0,
                    completed_qty: 0.0,
                    unit_cost: 0.0,
                    total_cost: 0.0,
                    available_stock: 0.0,
                    shortage: 0.0,
                    source_location: String::new(),
                });
                components.len() - 1
            });

            let required = num_field(row, mo::REQUIRED_QTY);
            let unit_cost = num_field(row, mo::UNIT_COST);
            let component = &mut components[index];
            component.required_qty += required;
            component.released_qty += num_field(row, mo::RELEASED_QTY);
            component.wip_qty += num_field(row, mo::WIP_QTY);
            component.reserved_qty += num_field(row, mo::RESERVED_QTY);
            component.completed_qty += num_field(row, mo::COMPLETED_QTY);
            component.total_cost += required * unit_cost;

            let location = str_field(row, mo::SOURCE_LOCATION);
            if !location.is_empty()
                && !component
                    .source_location
                    .split(", ")
                    .any(|existing| existing == location)
            {
                if component.source_location.is_empty() {
                    component.source_location = location;
                } else {
                    component.source_location.push_str(", ");
                    component.source_location.push_str(&location);
                }
            }
        }

        // Unit cost and shortage are only meaningful once every duplicate
        // line is folded in.
        let mut total_cost = 0.0;
        for component in &mut components {
            component.unit_cost = if component.required_qty != 0.0 {
                component.total_cost / component.required_qty
            } else {
                0.0
            };
            component.available_stock = self.primary.available_stock(&component.item_no);
            component.shortage = ((component.required_qty - component.released_qty)
                - component.available_stock)
                .max(0.0);
            component.description = self.item_description(&component.item_no);
            total_cost += component.total_cost;
        }

        let build_item_no = header
            .map(|h| upper_field(h, mo::BUILD_ITEM))
            .unwrap_or_default();
        let description = self.item_description(&build_item_no);

        Some(MoView {
            mo_no: key,
            build_item_no,
            description,
            ordered_qty: header.map(|h| num_field(h, mo::ORDERED_QTY)).unwrap_or(0.0),
            order_date: header
                .map(|h| date_field(h, mo::ORDER_DATE))
                .unwrap_or_default(),
            due_date: header
                .map(|h| date_field(h, mo::DUE_DATE))
                .unwrap_or_default(),
            customer: header
                .map(|h| str_field(h, mo::CUSTOMER))
                .unwrap_or_default(),
            status: header.map(|h| str_field(h, mo::STATUS)).unwrap_or_default(),
            on_hold: header.map(|h| bool_field(h, mo::ON_HOLD)).unwrap_or(false),
            components,
            total_cost,
        })
    }

    /// Item description from the master, falling back to the alert export
    /// for alert-only items.
    fn item_description(&self, item_key: &str) -> String {
        self.primary
            .items
            .get(item_key)
            .map(|master| str_field(master, item::DESCRIPTION))
            .filter(|d| !d.is_empty())
            .or_else(|| {
                self.primary
                    .item_alerts
                    .get(item_key)
                    .map(|row| str_field(row, item::DESCRIPTION))
            })
            .unwrap_or_default()
    }
}
