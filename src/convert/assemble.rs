use crate::convert::columns::ColumnRoles;
use crate::convert::extract::{active_variants, collect_images, DEFAULT_VARIANT};
use crate::convert::price::{clean_price, round_up_to_nine};
use crate::convert::tags;
use crate::convert::util::{is_blank, norm_key, slugify};
use crate::template::TemplateSchema;

/// Source columns whose text is concatenated into the product description.
/// The misspelled variant is the most common header in the wild.
const DESCRIPTION_COLUMNS: &[&str] = &[
    "Product Specifcation",
    "Product Specification",
    "Product specification",
];

/// Per-file row builder: template positions for the handle/image/position
/// columns are located once, then every source row explodes into its
/// variant rows plus trailing image-only rows.
pub struct Assembler<'a> {
    template: &'a TemplateSchema,
    roles: &'a ColumnRoles,
    headers: &'a [String],
    fallback_price_to_cost: bool,
    handle_col: Option<usize>,
    image_col: Option<usize>,
    position_col: Option<usize>,
    sku_col: Option<usize>,
}

impl<'a> Assembler<'a> {
    pub fn new(
        template: &'a TemplateSchema,
        roles: &'a ColumnRoles,
        headers: &'a [String],
        fallback_price_to_cost: bool,
    ) -> Self {
        let handle_col = template.find(|c| norm_key(c).contains("handle"));
        let image_col = template.find(|c| {
            let n = norm_key(c);
            n.contains("productimageurl")
                || n.contains("imagesrc")
                || n == "image"
                || n.contains("productimage")
        });
        let position_col = template.find(|c| {
            let l = c.to_lowercase();
            l.contains("position") && l.contains("image")
        });
        let sku_col = template.find(|c| {
            let n = norm_key(c);
            n == "sku" || n == "variantsku"
        });
        Assembler {
            template,
            roles,
            headers,
            fallback_price_to_cost,
            handle_col,
            image_col,
            position_col,
            sku_col,
        }
    }

    fn set(&self, out: &mut [String], column: &str, value: &str) {
        if let Some(i) = self.template.position(column) {
            out[i] = value.to_string();
        }
    }

    fn cell<'r>(&self, row: &'r [String], idx: Option<usize>) -> &'r str {
        idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
    }

    /// All output rows for one source row: one per variant, then one
    /// image-only row per extra image. Rows with a blank title produce
    /// nothing.
    pub fn product_rows(&self, row: &[String]) -> Vec<Vec<String>> {
        let title = self.cell(row, self.roles.title).trim();
        if is_blank(title) {
            return Vec::new();
        }

        // one handle per product, size-independent
        let handle = slugify(title);
        let variants = active_variants(row, self.headers, self.roles);
        let images = collect_images(row, self.roles);

        let selling = clean_price(self.cell(row, self.roles.selling_price));
        let mrp = clean_price(self.cell(row, self.roles.mrp));
        let cost = clean_price(self.cell(row, self.roles.cost));
        let price = if !selling.is_empty() {
            round_up_to_nine(&selling)
        } else if self.fallback_price_to_cost && !cost.is_empty() {
            round_up_to_nine(&cost)
        } else {
            String::new()
        };

        let description = self.description(row);
        let tag_list = tags::synthesize(row, self.headers, self.roles, &variants).join();

        let status = {
            let s = self.cell(row, self.roles.status).trim();
            if is_blank(s) {
                "Active".to_string()
            } else {
                s.to_string()
            }
        };

        let sku_base = {
            let s = self.cell(row, self.roles.sku).trim();
            if s.is_empty() {
                handle.to_uppercase()
            } else {
                s.to_string()
            }
        };

        let mut out_rows = Vec::with_capacity(variants.len() + images.len().saturating_sub(1));
        for (vi, size) in variants.iter().enumerate() {
            let mut out = self.template.empty_row();

            self.set(&mut out, "Title", title);
            if let Some(h) = self.handle_col {
                out[h] = handle.clone();
            }
            self.set(&mut out, "Description", &description);

            for (name, idx) in &self.roles.metafields {
                let value = row.get(*idx).map(|s| s.trim()).unwrap_or("");
                self.set(&mut out, name, value);
            }

            if self.roles.brand.is_some() {
                self.set(&mut out, "Vendor", self.cell(row, self.roles.brand));
            }
            if self.roles.product_category.is_some() {
                self.set(
                    &mut out,
                    "Product category",
                    self.cell(row, self.roles.product_category),
                );
                self.set(
                    &mut out,
                    "Google Shopping / Google product category",
                    self.cell(row, self.roles.product_category),
                );
            }
            if self.roles.subcategory.is_some() {
                let mut type_value = self.cell(row, self.roles.subcategory);
                if type_value.trim().is_empty() {
                    type_value = self.cell(row, self.roles.sub_subcategory);
                }
                self.set(&mut out, "Type", type_value);
            }

            self.set(&mut out, "Tags", &tag_list);

            self.set(&mut out, "Published on online store", "TRUE");
            self.set(&mut out, "Published", "TRUE");
            self.set(&mut out, "Status", &status);
            self.set(&mut out, "Charge tax", "TRUE");
            self.set(&mut out, "Requires shipping", "TRUE");
            self.set(&mut out, "Fulfillment service", "manual");
            self.set(&mut out, "Gift card", "FALSE");

            if size != DEFAULT_VARIANT {
                self.set(&mut out, "Option1 name", "Size");
                self.set(&mut out, "Option1 value", size);
            }

            self.set(&mut out, "Price", &price);
            self.set(&mut out, "Compare-at price", &mrp);
            self.set(&mut out, "Cost per item", &cost);

            self.set(&mut out, "SEO title", title);
            let seo_description: String = description.chars().take(320).collect();
            self.set(&mut out, "SEO description", &seo_description);

            if let Some(col) = self.sku_col {
                out[col] = variant_sku(&sku_base, size);
            }

            // primary image rides the first variant row only
            if vi == 0 {
                if let (Some(url), Some(col)) = (images.first(), self.image_col) {
                    out[col] = url.clone();
                    if let Some(pos) = self.position_col {
                        out[pos] = "1".to_string();
                    }
                }
            }

            out_rows.push(out);
        }

        for (i, extra) in images.iter().skip(1).enumerate() {
            let mut out = self.template.empty_row();
            if let Some(h) = self.handle_col {
                out[h] = handle.clone();
            }
            if let Some(col) = self.image_col {
                out[col] = extra.clone();
            }
            if let Some(pos) = self.position_col {
                out[pos] = (i + 2).to_string();
            }
            out_rows.push(out);
        }

        out_rows
    }

    fn description(&self, row: &[String]) -> String {
        let mut parts = Vec::new();
        for candidate in DESCRIPTION_COLUMNS {
            if let Some(i) = self.headers.iter().position(|h| h == candidate) {
                let text = row.get(i).map(|s| s.trim()).unwrap_or("");
                if !text.is_empty() {
                    parts.push(text);
                }
            }
        }
        parts.join("\n\n")
    }
}

/// Per-variant SKU: the base, suffixed for real sizes with the slugged,
/// upper-cased, hyphen-stripped size label.
fn variant_sku(base: &str, size: &str) -> String {
    if size == DEFAULT_VARIANT {
        return base.to_string();
    }
    let suffix = slugify(size).to_uppercase().replace('-', "");
    if suffix.is_empty() {
        base.to_string()
    } else {
        format!("{}-{}", base, suffix)
    }
}
