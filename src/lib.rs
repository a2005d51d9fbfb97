//! listforge converts messy, human-maintained product-listing CSVs into the
//! exact column set and order of a downstream catalog-import template.
//!
//! The interesting work lives in [`convert`]: header promotion, column-role
//! resolution across naming variants, size-variant row explosion, image
//! sequencing, tag synthesis and price rounding. [`batch`] wraps it with
//! per-file orchestration; [`table`] and [`template`] are the I/O edges.

pub mod batch;
pub mod convert;
pub mod table;
pub mod template;
