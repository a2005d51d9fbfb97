use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// URL-safe slug: lower-case, drop everything but letters/digits/spaces/
/// dashes, spaces become single dashes, runs of dashes collapse.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped = NON_SLUG.replace_all(&lowered, "");
    let dashed = WHITESPACE.replace_all(&stripped, "-");
    let collapsed = DASH_RUN.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// Lower-case and keep only ascii letters and digits. This is the
/// normalization both column-role matching and the pruner key off.
pub fn norm_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// A cell that carries no usable text: empty after trimming, or the string
/// a float-typed spreadsheet export leaves behind for missing values.
pub fn is_blank(cell: &str) -> bool {
    let t = cell.trim();
    t.is_empty() || t.eq_ignore_ascii_case("nan")
}

/// Boolean flag columns count only an exact numeric 1 as set; "1.0" counts,
/// "2", "true", "yes" and blanks do not.
pub fn is_one(cell: &str) -> bool {
    let t = cell.trim();
    if is_blank(t) {
        return false;
    }
    matches!(t.parse::<f64>(), Ok(v) if v == 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basics() {
        assert_eq!(slugify("Blue Romper"), "blue-romper");
        assert_eq!(slugify("  Söft  (Cotton)  Set!  "), "sft-cotton-set");
        assert_eq!(slugify("a---b   c"), "a-b-c");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn norm_key_strips_everything_but_alnum() {
        assert_eq!(norm_key("Cost to Kiddo"), "costtokiddo");
        assert_eq!(norm_key("Final\nPrice"), "finalprice");
        assert_eq!(norm_key("Inventory policy"), "inventorypolicy");
        assert_eq!(norm_key("*Boys + Unisex*"), "boysunisex");
    }

    #[test]
    fn is_one_accepts_only_numeric_one() {
        assert!(is_one("1"));
        assert!(is_one(" 1.0 "));
        assert!(!is_one("2"));
        assert!(!is_one("0"));
        assert!(!is_one("true"));
        assert!(!is_one("nan"));
        assert!(!is_one(""));
    }

    #[test]
    fn blank_covers_nan_spellings() {
        assert!(is_blank("  "));
        assert!(is_blank("nan"));
        assert!(is_blank("NaN"));
        assert!(!is_blank("0"));
    }
}
