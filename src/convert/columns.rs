use crate::convert::util::norm_key;
use crate::table::Table;
use crate::template::OPTIONAL_COLUMNS;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Canonical size tokens a header may match exactly (case-insensitive).
/// Order here is irrelevant; detection order follows source column order.
pub const SIZE_TOKENS: &[&str] = &[
    "NB", "0-2M", "2-4M", "4-6M", "0-3M", "3-6M", "6-9M", "6-12M", "9-12M", "12-18M", "18-24M",
    "1-2Y", "2-3Y", "3-4Y", "4-5Y", "5-6Y", "One Size", "S", "M", "L", "XL", "XXL", "0-6M Toys",
    "6-12M Toys", "12-18M Toys", "18-24M Toys", "2 Plus", "3 Plus", "4 Plus", "5 Plus", "6 Plus",
    "All Ages",
];

/// Fallback for age-range headers the catalog did not anticipate:
/// `<digits>[-digits]<m|y>`, e.g. "7-8Y" or "24m".
static SIZE_HEADER_FALLBACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d+\s*-?\s*\d*\s*[my]$").unwrap());

/// Tag pass-through columns whose literal cell text becomes a tag.
const PASS_THROUGH_TEXT: &[&[&str]] = &[
    &["Subcategory", "Sub Category"],
    &["Season"],
    &["Campaign"],
    &["Sizes"],
    &["Milestone Development", "Milestone"],
    &["Make"],
];

/// Age-threshold columns: the canonical tag is emitted only when the cell is
/// exactly 1.
const PASS_THROUGH_ONE: &[(&str, &[&str])] = &[
    ("2 Plus", &["2 Plus", "2+"]),
    ("3 Plus", &["3 Plus", "3+"]),
    ("4 Plus", &["4 Plus", "4+"]),
    ("5 Plus", &["5 Plus", "5+"]),
    ("6 Plus", &["6 Plus", "6+"]),
    ("All Ages", &["All Ages"]),
];

/// Every semantic role the engine needs, resolved once per file to a source
/// column position (`None` when the sheet has no usable match; downstream
/// output for that role degrades to empty).
#[derive(Debug, Default)]
pub struct ColumnRoles {
    pub title: Option<usize>,
    pub brand: Option<usize>,
    pub product_category: Option<usize>,
    pub subcategory: Option<usize>,
    pub sub_subcategory: Option<usize>,
    pub cost: Option<usize>,
    pub mrp: Option<usize>,
    pub selling_price: Option<usize>,
    pub sku: Option<usize>,
    pub status: Option<usize>,
    pub size_chart: Option<usize>,
    pub drop_active: Option<usize>,
    /// Columns whose name contains "image", in source order; this order is
    /// image precedence.
    pub image_columns: Vec<usize>,
    /// Size columns in source order: catalog hits first, fallback-pattern
    /// hits appended.
    pub size_columns: Vec<usize>,
    /// Resolved optional metafield/inventory columns: (output column, source
    /// position).
    pub metafields: Vec<(&'static str, usize)>,
    /// Tag pass-through columns contributing their literal cell text.
    pub pass_text: Vec<usize>,
    /// Tag pass-through columns contributing a canonical tag on exact 1.
    pub pass_one: Vec<(&'static str, usize)>,
}

/// Find a source column for a list of candidate names, priority order.
/// Exact match on the normalized name wins; failing that, the candidate
/// (lower-cased, spaces removed) found as a substring of a column name
/// treated the same way. Deterministic; `None` rather than an error.
pub fn find_column(columns: &[String], candidates: &[&str]) -> Option<usize> {
    for cand in candidates {
        let key = norm_key(cand);
        if key.is_empty() {
            continue;
        }
        if let Some(i) = columns.iter().position(|c| norm_key(c) == key) {
            return Some(i);
        }
    }
    for cand in candidates {
        let needle = cand.to_lowercase().replace(' ', "");
        if needle.is_empty() {
            continue;
        }
        if let Some(i) = columns
            .iter()
            .position(|c| c.to_lowercase().replace(' ', "").contains(&needle))
        {
            return Some(i);
        }
    }
    None
}

/// Every column whose lower-cased name contains "image", in source order.
pub fn detect_image_columns(columns: &[String]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.to_lowercase().contains("image"))
        .map(|(i, _)| i)
        .collect()
}

/// Size columns: catalog tokens matched exactly (trimmed, case-insensitive),
/// then the digit/m/y fallback pattern for headers the catalog missed.
pub fn detect_size_columns(columns: &[String]) -> Vec<usize> {
    let mut found: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            let name = c.trim();
            SIZE_TOKENS.iter().any(|t| name.eq_ignore_ascii_case(t))
        })
        .map(|(i, _)| i)
        .collect();

    for (i, c) in columns.iter().enumerate() {
        if !found.contains(&i) && SIZE_HEADER_FALLBACK.is_match(c.trim()) {
            found.push(i);
        }
    }
    found
}

/// One resolution pass over a promoted table. Sample rows are only consulted
/// for the title fallback: when no title candidate matches, the first column
/// whose first ten values contain a non-empty, non-numeric string stands in,
/// else column 0.
pub fn resolve_roles(source: &Table) -> ColumnRoles {
    let cols = &source.headers;

    let mut roles = ColumnRoles {
        title: find_column(cols, &["Title", "Product Title", "Name"]),
        brand: find_column(cols, &["Brand Name", "Vendor", "Brand"]),
        product_category: find_column(cols, &["Product category", "Category"]),
        subcategory: find_column(cols, &["Subcategory", "Sub Category", "Type"]),
        sub_subcategory: find_column(cols, &["Sub Sub Category", "SubSubCategory"]),
        cost: find_column(cols, &["Cost to Kiddo", "Cost"]),
        mrp: find_column(cols, &["MRP"]),
        selling_price: find_column(cols, &["Final Price", "Final\nPrice", "Selling Price", "Final"]),
        sku: find_column(cols, &["SKU", "SKU Code", "Sku"]),
        status: find_column(cols, &["Status"]),
        size_chart: find_column(cols, &["Size chart", "Size Chart", "Sizechart"]),
        drop_active: find_column(cols, &["DROP_ACTIVE", "Drop Active"]),
        image_columns: detect_image_columns(cols),
        size_columns: detect_size_columns(cols),
        ..ColumnRoles::default()
    };

    if roles.title.is_none() {
        roles.title = cols
            .iter()
            .enumerate()
            .find(|(i, _)| {
                source.rows.iter().take(10).any(|row| {
                    let cell = row.get(*i).map(|s| s.trim()).unwrap_or("");
                    !cell.is_empty() && !cell.chars().all(|c| c.is_ascii_digit())
                })
            })
            .map(|(i, _)| i)
            .or(if cols.is_empty() { None } else { Some(0) });
        debug!(column = ?roles.title, "no title header matched, using fallback column");
    }

    for &(name, candidates) in OPTIONAL_COLUMNS {
        if let Some(idx) = find_column(cols, candidates) {
            roles.metafields.push((name, idx));
        }
    }
    for candidates in PASS_THROUGH_TEXT {
        if let Some(idx) = find_column(cols, candidates) {
            roles.pass_text.push(idx);
        }
    }
    for &(canonical, candidates) in PASS_THROUGH_ONE {
        if let Some(idx) = find_column(cols, candidates) {
            roles.pass_one.push((canonical, idx));
        }
    }

    debug!(
        title = ?roles.title,
        images = roles.image_columns.len(),
        sizes = roles.size_columns.len(),
        metafields = roles.metafields.len(),
        "resolved column roles"
    );
    roles
}
