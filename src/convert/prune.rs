use crate::convert::util::norm_key;
use crate::table::Table;
use std::collections::HashSet;
use tracing::debug;

/// Inventory-tracking columns the downstream import rejects, by normalized
/// name. Columns the engine explicitly populated from a resolved source
/// column are exempt: explicit population always wins over the denylist.
pub const INVENTORY_DENYLIST: &[&str] = &[
    "inventorypolicy",
    "variantinventorypolicy",
    "inventoryquantity",
    "continuesellingwhenoutofstock",
    "inventorytracker",
];

pub fn prune_inventory_columns(table: Table, populated: &HashSet<String>) -> Table {
    let keep: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            let key = norm_key(name);
            !INVENTORY_DENYLIST.contains(&key.as_str()) || populated.contains(&key)
        })
        .map(|(i, _)| i)
        .collect();

    if keep.len() == table.headers.len() {
        return table;
    }
    debug!(dropped = table.headers.len() - keep.len(), "pruned inventory columns");

    let headers = keep.iter().map(|&i| table.headers[i].clone()).collect();
    let rows = table
        .rows
        .iter()
        .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Table { headers, rows }
}
