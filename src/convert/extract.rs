use crate::convert::columns::ColumnRoles;

/// Variant label for rows with no active size column. Suppresses Option
/// name/value output downstream and leaves the SKU unsuffixed.
pub const DEFAULT_VARIANT: &str = "Default";

/// A size cell marks its column active when it carries a real value:
/// numeric cells must be non-zero and non-NaN, anything else just has to be
/// non-blank and not the literal "0"/"nan" a spreadsheet export leaves
/// behind.
fn is_active(cell: &str) -> bool {
    let t = cell.trim();
    if let Ok(v) = t.parse::<f64>() {
        return v != 0.0 && !v.is_nan();
    }
    !t.is_empty() && !t.eq_ignore_ascii_case("nan")
}

/// The row's variant list: trimmed names of its active size columns, in
/// detection order. No active size yields the single synthetic default.
pub fn active_variants(row: &[String], headers: &[String], roles: &ColumnRoles) -> Vec<String> {
    let mut variants: Vec<String> = roles
        .size_columns
        .iter()
        .filter(|&&i| row.get(i).map(|c| is_active(c)).unwrap_or(false))
        .filter_map(|&i| headers.get(i).map(|h| h.trim().to_string()))
        .collect();
    if variants.is_empty() {
        variants.push(DEFAULT_VARIANT.to_string());
    }
    variants
}

/// Ordered, de-duplicated image URLs for the row: image columns in
/// detection order, then the size-chart image when present and not already
/// collected. The first entry is the row's primary image.
pub fn collect_images(row: &[String], roles: &ColumnRoles) -> Vec<String> {
    fn push(cell: Option<&String>, images: &mut Vec<String>) {
        if let Some(cell) = cell {
            let url = cell.trim();
            if !url.is_empty() && !url.eq_ignore_ascii_case("nan") && !images.iter().any(|u| u == url)
            {
                images.push(url.to_string());
            }
        }
    }

    let mut images: Vec<String> = Vec::new();
    for &i in &roles.image_columns {
        push(row.get(i), &mut images);
    }
    if let Some(i) = roles.size_chart {
        push(row.get(i), &mut images);
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::columns::resolve_roles;
    use crate::table::Table;

    fn source(headers: &[&str], row: &[&str]) -> (Table, Vec<String>) {
        let table = Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: vec![row.iter().map(|s| s.to_string()).collect()],
        };
        let row = table.rows[0].clone();
        (table, row)
    }

    #[test]
    fn active_sizes_in_detection_order() {
        let (table, row) = source(
            &["Title", "0-3M", "6-9M", "2-3Y"],
            &["Romper", "1", "", "yes"],
        );
        let roles = resolve_roles(&table);
        assert_eq!(active_variants(&row, &table.headers, &roles), vec!["0-3M", "2-3Y"]);
    }

    #[test]
    fn zero_nan_and_blank_cells_are_inactive() {
        let (table, row) = source(
            &["Title", "0-3M", "6-9M", "9-12M", "1-2Y"],
            &["Romper", "0", "nan", "0.0", "  "],
        );
        let roles = resolve_roles(&table);
        assert_eq!(
            active_variants(&row, &table.headers, &roles),
            vec![DEFAULT_VARIANT]
        );
    }

    #[test]
    fn images_dedupe_and_keep_column_order() {
        let (table, row) = source(
            &["Title", "Image 1", "Image 2", "Image 3", "Size chart"],
            &[
                "Romper",
                "http://img/a.jpg",
                "http://img/a.jpg",
                "http://img/b.jpg",
                "http://img/chart.jpg",
            ],
        );
        let roles = resolve_roles(&table);
        assert_eq!(
            collect_images(&row, &roles),
            vec!["http://img/a.jpg", "http://img/b.jpg", "http://img/chart.jpg"]
        );
    }

    #[test]
    fn size_chart_already_collected_is_not_repeated() {
        let (table, row) = source(
            &["Title", "Image 1", "Size chart"],
            &["Romper", "http://img/chart.jpg", "http://img/chart.jpg"],
        );
        let roles = resolve_roles(&table);
        assert_eq!(collect_images(&row, &roles), vec!["http://img/chart.jpg"]);
    }

    #[test]
    fn nan_urls_are_dropped() {
        let (table, row) = source(&["Title", "Image 1", "Image 2"], &["Romper", "nan", ""]);
        let roles = resolve_roles(&table);
        assert!(collect_images(&row, &roles).is_empty());
    }
}
