use crate::convert::{self, Options};
use crate::table;
use crate::template::{self, TemplateSchema};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

const OUTPUT_SUFFIX: &str = " - Converted - Shopify.csv";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Explicit template path; when unset the well-known defaults are
    /// searched in the working directory.
    pub template: Option<PathBuf>,
    /// Output file or directory; unset derives a name beside each source.
    pub out: Option<PathBuf>,
    pub fallback_price_to_cost: bool,
}

/// Per-file outcome, also serialized verbatim into the JSON report.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn ok(source: &Path, output: &Path, rows: usize) -> Self {
        FileReport {
            source: source.display().to_string(),
            output: Some(output.display().to_string()),
            status: "ok",
            rows: Some(rows),
            error: None,
        }
    }

    fn failed(source: &Path, output: Option<&Path>, err: &anyhow::Error) -> Self {
        FileReport {
            source: source.display().to_string(),
            output: output.map(|p| p.display().to_string()),
            status: "error",
            rows: None,
            error: Some(format!("{:#}", err)),
        }
    }
}

/// Convert every source against one shared template. Only a missing or
/// unreadable template is fatal; anything that goes wrong with a single
/// file becomes its error entry and the loop moves on.
pub fn run(sources: &[PathBuf], options: &BatchOptions) -> Result<Vec<FileReport>> {
    let template_path = match &options.template {
        Some(path) => path.clone(),
        None => template::locate_default(Path::new("."))?,
    };
    let schema = TemplateSchema::load(&template_path)?;
    info!(template = %template_path.display(), files = sources.len(), "starting batch");

    let outputs = output_paths(sources, options.out.as_deref())?;
    let convert_options = Options {
        fallback_price_to_cost: options.fallback_price_to_cost,
    };

    let mut reports = Vec::with_capacity(sources.len());
    for (source, output) in sources.iter().zip(&outputs) {
        match convert_file(source, &schema, output, &convert_options) {
            Ok(rows) => reports.push(FileReport::ok(source, output, rows)),
            Err(err) => {
                error!(source = %source.display(), "conversion failed: {:#}", err);
                reports.push(FileReport::failed(source, Some(output), &err));
            }
        }
    }
    Ok(reports)
}

/// One file end to end: read, convert, write. Returns the output row count.
#[instrument(level = "info", skip_all, fields(source = %source.display()))]
pub fn convert_file(
    source: &Path,
    schema: &TemplateSchema,
    output: &Path,
    options: &Options,
) -> Result<usize> {
    let raw = table::read_raw(source)?;
    let conversion = convert::convert(&raw, schema, options);
    table::write(output, &conversion.table)?;
    info!(rows = conversion.row_count, output = %output.display(), "wrote converted file");
    Ok(conversion.row_count)
}

/// Derive one output path per source.
///
/// No `--out`: `<stem> - Converted - Shopify.csv` beside each source.
/// `--out <dir>` (existing dir, or extensionless and absent): the same
/// derived names inside it, creating the directory if needed.
/// `--out <file>`: used verbatim for a single source; with several sources
/// the stem becomes a base name suffixed `_1`, `_2`, ….
pub fn output_paths(sources: &[PathBuf], out: Option<&Path>) -> Result<Vec<PathBuf>> {
    let out = match out {
        None => {
            return Ok(sources.iter().map(|s| derived_name(s)).collect());
        }
        Some(out) => out,
    };

    let treat_as_dir = out.is_dir() || (!out.exists() && out.extension().is_none());
    if treat_as_dir {
        fs::create_dir_all(out)
            .with_context(|| format!("failed to create output directory {}", out.display()))?;
        return Ok(sources
            .iter()
            .map(|s| out.join(file_name_of(&derived_name(s))))
            .collect());
    }

    if sources.len() <= 1 {
        return Ok(vec![out.to_path_buf()]);
    }

    // several sources sharing one custom name: suffix an index
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted".to_string());
    Ok((1..=sources.len())
        .map(|i| out.with_file_name(format!("{}_{}.csv", stem, i)))
        .collect())
}

fn derived_name(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "source".to_string());
    source.with_file_name(format!("{}{}", stem, OUTPUT_SUFFIX))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted.csv".to_string())
}
