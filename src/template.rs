use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Output columns the downstream import understands but which many templates
/// omit. Missing ones are appended (never inserted) so column order from the
/// template itself stays untouched. The candidate lists are the source-side
/// spellings each column is copied from, including the metafield-qualified
/// headers newer exports carry.
pub const OPTIONAL_COLUMNS: &[(&str, &[&str])] = &[
    ("Fabric", &["Fabric", "Fabric (product.metafields.custom.fabric)"]),
    (
        "Wash Care",
        &[
            "Wash Care",
            "Wash care",
            "Wash Care (product.metafields.custom.wash_care)",
        ],
    ),
    (
        "Material",
        &["Material", "Material (product.metafields.custom.material)"],
    ),
    (
        "Shalf",
        &["Shalf", "Shelf", "Shalf (product.metafields.custom.shalf)"],
    ),
    ("Test", &["Test", "Test (product.metafields.custom.test)"]),
    ("Variant Image", &["Variant Image", "Variant image"]),
    (
        "Variant Weight Unit",
        &["Variant Weight Unit", "Variant weight unit"],
    ),
    ("Variant Tax Code", &["Variant Tax Code", "Variant tax code"]),
    ("Shelf No", &["Shelf No", "Shelf Number"]),
    ("Inventory Tracker", &["Inventory Tracker"]),
    (
        "Inventory Quantity",
        &["Inventory Quantity", "Inventory Qty", "Quantity"],
    ),
];

/// Template files looked up, in order, when the caller does not supply one.
pub const DEFAULT_TEMPLATE_NAMES: &[&str] = &[
    "SomerSault_listings1_shopify_final_inventory-fixed.csv",
    "product_template_unit_price.csv",
    "template.csv",
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no template supplied and none of {names:?} exist in {dir:?}")]
    NotFound { dir: PathBuf, names: Vec<String> },
    #[error("failed to read template {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("template {path:?} has no header row")]
    Empty { path: PathBuf },
}

/// The target schema: an ordered column list whose order defines output
/// column order for the whole run.
#[derive(Debug, Clone)]
pub struct TemplateSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl TemplateSchema {
    /// Build from a template's header row, appending any missing optional
    /// columns at the end.
    pub fn new(mut columns: Vec<String>) -> Self {
        for (name, _) in OPTIONAL_COLUMNS {
            if !columns.iter().any(|c| c == name) {
                columns.push((*name).to_string());
            }
        }
        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            // duplicates resolve to the leftmost position
            index.entry(col.clone()).or_insert(i);
        }
        TemplateSchema { columns, index }
    }

    /// Load the schema from a template file's header row.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| TemplateError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut records = rdr.records();
        let header = match records.next() {
            Some(Ok(record)) => record,
            Some(Err(source)) => {
                return Err(TemplateError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
            None => {
                return Err(TemplateError::Empty {
                    path: path.to_path_buf(),
                })
            }
        };

        let columns: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        if columns.iter().all(|c| c.trim().is_empty()) {
            return Err(TemplateError::Empty {
                path: path.to_path_buf(),
            });
        }
        debug!(columns = columns.len(), path = %path.display(), "loaded template schema");
        Ok(Self::new(columns))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of an exactly-named column, leftmost occurrence.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// First column whose raw name satisfies the predicate.
    pub fn find<F: Fn(&str) -> bool>(&self, pred: F) -> Option<usize> {
        self.columns.iter().position(|c| pred(c))
    }

    /// A fresh output row: one empty cell per column.
    pub fn empty_row(&self) -> Vec<String> {
        vec![String::new(); self.columns.len()]
    }
}

/// Look for one of the well-known default templates in `dir`.
/// Missing templates are fatal to the whole batch, so this is the one error
/// surfaced before any per-file work starts.
pub fn locate_default(dir: &Path) -> Result<PathBuf, TemplateError> {
    for name in DEFAULT_TEMPLATE_NAMES {
        let candidate = dir.join(name);
        if candidate.is_file() {
            info!(template = %candidate.display(), "using default template");
            return Ok(candidate);
        }
    }
    Err(TemplateError::NotFound {
        dir: dir.to_path_buf(),
        names: DEFAULT_TEMPLATE_NAMES.iter().map(|s| s.to_string()).collect(),
    })
}
