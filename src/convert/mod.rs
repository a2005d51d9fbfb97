//! The normalization engine: header promotion, column-role resolution, row
//! explosion, price and tag synthesis, and inventory-column pruning.
//!
//! A conversion is a pure function of (source rows, template, options): no
//! caches, no cross-call state, so results are reproducible in isolation.

pub mod assemble;
pub mod columns;
pub mod extract;
pub mod header;
pub mod price;
pub mod prune;
pub mod tags;
pub mod util;

use crate::table::Table;
use crate::template::TemplateSchema;
use crate::convert::assemble::Assembler;
use crate::convert::prune::INVENTORY_DENYLIST;
use crate::convert::util::norm_key;
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Options {
    /// Advertise the cost price (rounded) when the selling price is missing.
    pub fallback_price_to_cost: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            fallback_price_to_cost: true,
        }
    }
}

#[derive(Debug)]
pub struct Conversion {
    pub table: Table,
    pub row_count: usize,
}

/// Run the whole pipeline over one raw source table.
pub fn convert(raw: &[Vec<String>], template: &TemplateSchema, options: &Options) -> Conversion {
    let source = header::promote(raw, header::LOOKAHEAD);
    let roles = columns::resolve_roles(&source);

    let assembler = Assembler::new(template, &roles, &source.headers, options.fallback_price_to_cost);
    let mut rows = Vec::new();
    for row in &source.rows {
        rows.extend(assembler.product_rows(row));
    }

    // columns the engine filled from a real source column outrank the
    // inventory denylist
    let populated: HashSet<String> = roles
        .metafields
        .iter()
        .map(|(name, _)| norm_key(name))
        .filter(|key| INVENTORY_DENYLIST.contains(&key.as_str()))
        .collect();

    let table = prune::prune_inventory_columns(
        Table {
            headers: template.columns().to_vec(),
            rows,
        },
        &populated,
    );

    let row_count = table.rows.len();
    info!(
        source_rows = source.rows.len(),
        output_rows = row_count,
        "conversion complete"
    );
    Conversion { table, row_count }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn template() -> TemplateSchema {
        TemplateSchema::new(
            [
                "Title",
                "URL handle",
                "Vendor",
                "Tags",
                "Option1 name",
                "Option1 value",
                "Price",
                "Inventory policy",
                "Product image URL",
                "Image position",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }

    #[test]
    fn end_to_end_with_preamble_variants_and_images() {
        let tpl = template();
        let raw = raw(&[
            &["Moms home listings", "", "", "", "", "", ""],
            &["Title", "Brand Name", "Final Price", "0-3M", "6-9M", "Image 1", "Image 2"],
            &[
                "Blue Romper",
                "Moms home",
                "999",
                "1",
                "1",
                "http://img/a.jpg",
                "http://img/b.jpg",
            ],
            &["", "", "", "", "", "", ""],
        ]);
        let conversion = convert(&raw, &tpl, &Options::default());

        // two variant rows + one image-only row; the blank-title row is gone
        assert_eq!(conversion.row_count, 3);
        let table = &conversion.table;

        // the inventory column was pruned, everything else kept template order
        assert!(table.column_index("Inventory policy").is_none());
        let handle = table.column_index("URL handle").unwrap();
        let price = table.column_index("Price").unwrap();
        let opt = table.column_index("Option1 value").unwrap();
        let pos = table.column_index("Image position").unwrap();

        assert!(table.rows.iter().all(|r| r[handle] == "blue-romper"));
        assert_eq!(table.rows[0][opt], "0-3M");
        assert_eq!(table.rows[1][opt], "6-9M");
        assert_eq!(table.rows[0][price], "999");
        assert_eq!(table.rows[0][pos], "1");
        assert_eq!(table.rows[2][pos], "2");
    }

    #[test]
    fn variant_row_count_matches_active_sizes() {
        let tpl = template();
        let raw = raw(&[
            &["Title", "0-3M", "6-9M", "2-3Y"],
            &["Three Sizes", "1", "1", "1"],
            &["No Sizes", "", "0", "nan"],
        ]);
        let conversion = convert(&raw, &tpl, &Options::default());
        let handle = conversion.table.column_index("URL handle").unwrap();
        let three: Vec<_> = conversion
            .table
            .rows
            .iter()
            .filter(|r| r[handle] == "three-sizes")
            .collect();
        let none: Vec<_> = conversion
            .table
            .rows
            .iter()
            .filter(|r| r[handle] == "no-sizes")
            .collect();
        assert_eq!(three.len(), 3);
        assert_eq!(none.len(), 1);
    }

    #[test]
    fn conversion_is_reproducible() {
        let tpl = template();
        let raw = raw(&[
            &["Title", "Final Price"],
            &["Item", "1000"],
        ]);
        let a = convert(&raw, &tpl, &Options::default());
        let b = convert(&raw, &tpl, &Options::default());
        assert_eq!(a.table, b.table);
    }
}
