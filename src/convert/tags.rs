use crate::convert::columns::ColumnRoles;
use crate::convert::extract::DEFAULT_VARIANT;
use crate::convert::util::{is_blank, is_one};
use once_cell::sync::Lazy;
use regex::Regex;

/// Toy-range sizes double as tags whenever they are active on the row.
pub const TOY_SIZES: &[&str] = &["0-6M Toys", "6-12M Toys", "12-18M Toys", "18-24M Toys"];

/// Size-pattern → age-group table for gendered age tags. A pattern matches a
/// normalized size on exact equality, or as a substring when it is at least
/// three characters long.
const AGE_GROUPS: &[(&[&str], &str)] = &[
    (&["nb", "newborn", "0-2m", "0-3m"], "0-3m"),
    (&["2-4m", "3-6m", "4-6m"], "3-6m"),
    (&["6-9m", "6-12m", "9-12m"], "6-12m"),
    (&["12-18m", "18-24m", "1-2y"], "1-2y"),
    (&["2-3y", "3-4y", "2-4y"], "2-4y"),
    (&["4-5y", "5-6y", "4-6y"], "4-6y"),
];

static AGE_THRESHOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([2-6])(\+|plus)$").unwrap());

/// Insertion-ordered set of tags; duplicates collapse on first-seen order.
#[derive(Debug, Default)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn insert(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.0.iter().any(|t| *t == tag) {
            self.0.push(tag);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn join(&self) -> String {
        self.0.join(", ")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

type Predicate = fn(&str) -> bool;
type Emitter = fn(&str, &mut TagSet);

/// Boolean-flag rules, evaluated in order against the normalized column
/// name; the first matching rule emits and the scan moves to the next
/// column. Combined gender columns must come before the singular ones.
static FLAG_RULES: &[(Predicate, Emitter)] = &[
    (girls_unisex, emit_girl_unisex),
    (boys_unisex, emit_boy_unisex),
    (boy, emit_boy),
    (girl, emit_girl),
    (unisex, emit_unisex),
    (newborn, emit_newborn),
    (age_threshold, emit_age_threshold),
    (all_ages, emit_all_ages),
];

fn girls_unisex(name: &str) -> bool {
    name.contains("girls") && name.contains("unisex")
}
fn boys_unisex(name: &str) -> bool {
    name.contains("boys") && name.contains("unisex")
}
fn boy(name: &str) -> bool {
    name == "boy" || name == "boys"
}
fn girl(name: &str) -> bool {
    name == "girl" || name == "girls"
}
fn unisex(name: &str) -> bool {
    name == "unisex"
}
fn newborn(name: &str) -> bool {
    name == "nb" || name == "newborn"
}
fn age_threshold(name: &str) -> bool {
    AGE_THRESHOLD.is_match(name)
}
fn all_ages(name: &str) -> bool {
    name == "allages"
}

fn emit_girl_unisex(_: &str, tags: &mut TagSet) {
    tags.insert("Girl");
    tags.insert("Unisex");
}
fn emit_boy_unisex(_: &str, tags: &mut TagSet) {
    tags.insert("Boy");
    tags.insert("Unisex");
}
fn emit_boy(_: &str, tags: &mut TagSet) {
    tags.insert("Boy");
}
fn emit_girl(_: &str, tags: &mut TagSet) {
    tags.insert("Girl");
}
fn emit_unisex(_: &str, tags: &mut TagSet) {
    tags.insert("Unisex");
}
fn emit_newborn(_: &str, tags: &mut TagSet) {
    tags.insert("Newborn");
}
fn emit_age_threshold(name: &str, tags: &mut TagSet) {
    if let Some(caps) = AGE_THRESHOLD.captures(name) {
        tags.insert(format!("{} Plus", &caps[1]));
    }
}
fn emit_all_ages(_: &str, tags: &mut TagSet) {
    tags.insert("All Ages");
}

/// Column-name normalization for the flag scan: asterisks and whitespace
/// stripped, case folded.
fn norm_flag(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '*' && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Size normalization for age-group matching: lower-case, dash variants to a
/// plain hyphen, all whitespace removed.
fn norm_size(size: &str) -> String {
    size.to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn age_group_matches(patterns: &[&str], normalized: &str) -> bool {
    patterns
        .iter()
        .any(|p| normalized == *p || (p.len() >= 3 && normalized.contains(p)))
}

/// Build the row's tag set. `variants` is the row's full active-variant
/// list, so the result is identical across every output row of the product.
pub fn synthesize(
    row: &[String],
    headers: &[String],
    roles: &ColumnRoles,
    variants: &[String],
) -> TagSet {
    let mut tags = TagSet::default();
    let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");

    // 1) brand / category / subcategory literals
    for idx in [roles.brand, roles.product_category, roles.subcategory]
        .into_iter()
        .flatten()
    {
        let v = cell(idx);
        if !is_blank(v) {
            tags.insert(v);
        }
    }

    // 2) pass-through columns
    for &idx in &roles.pass_text {
        let v = cell(idx);
        if !is_blank(v) {
            tags.insert(v);
        }
    }
    for &(canonical, idx) in &roles.pass_one {
        if is_one(cell(idx)) {
            tags.insert(canonical);
        }
    }

    // 3) active toy sizes, verbatim
    for variant in variants {
        if TOY_SIZES.iter().any(|t| variant.eq_ignore_ascii_case(t)) {
            tags.insert(variant.as_str());
        }
    }

    // 4) boolean-flag scan over every source column
    for (i, name) in headers.iter().enumerate() {
        if !is_one(cell(i)) {
            continue;
        }
        let normalized = norm_flag(name);
        for (applies, emit) in FLAG_RULES {
            if applies(&normalized) {
                emit(&normalized, &mut tags);
                break;
            }
        }
    }

    // 5) drop-active marker
    if let Some(idx) = roles.drop_active {
        if cell(idx).eq_ignore_ascii_case("true") {
            tags.insert("DROP_ACTIVE");
        }
    }

    // 6) gendered age-group inference from active sizes
    for gender in ["Boy", "Girl"] {
        if !tags.contains(gender) {
            continue;
        }
        for variant in variants {
            if variant == DEFAULT_VARIANT {
                continue;
            }
            let normalized = norm_size(variant);
            for (patterns, group) in AGE_GROUPS {
                if age_group_matches(patterns, &normalized) {
                    tags.insert(format!("{} {}", gender, group));
                }
            }
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::columns::resolve_roles;
    use crate::table::Table;

    fn run(headers: &[&str], row: &[&str], variants: &[&str]) -> Vec<String> {
        let table = Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: vec![row.iter().map(|s| s.to_string()).collect()],
        };
        let roles = resolve_roles(&table);
        let variants: Vec<String> = variants.iter().map(|s| s.to_string()).collect();
        synthesize(&table.rows[0], &table.headers, &roles, &variants)
            .as_slice()
            .to_vec()
    }

    #[test]
    fn brand_category_and_type_come_first() {
        let tags = run(
            &["Title", "Brand Name", "Product category", "Subcategory"],
            &["Romper", "Moms home", "Clothing", "Rompers"],
            &[DEFAULT_VARIANT],
        );
        assert_eq!(tags, vec!["Moms home", "Clothing", "Rompers"]);
    }

    #[test]
    fn combined_gender_column_emits_both_tags_once() {
        let tags = run(
            &["Title", "*Boys + Unisex*"],
            &["Romper", "1"],
            &[DEFAULT_VARIANT],
        );
        assert_eq!(tags, vec!["Boy", "Unisex"]);
    }

    #[test]
    fn girls_unisex_and_singulars() {
        let tags = run(
            &["Title", "Girls+Unisex", "*Girl", "NB"],
            &["Romper", "1", "1", "1"],
            &[DEFAULT_VARIANT],
        );
        // NB is also a size column, but here its flag value drives the tag
        assert_eq!(tags, vec!["Girl", "Unisex", "Newborn"]);
    }

    #[test]
    fn flags_require_exactly_one() {
        let tags = run(
            &["Title", "Boys", "Girls", "Unisex"],
            &["Romper", "2", "true", ""],
            &[DEFAULT_VARIANT],
        );
        assert!(tags.is_empty());
    }

    #[test]
    fn age_thresholds_accept_loose_spellings() {
        let tags = run(
            &["Title", "2+", "3 Plus", "6plus", "All ages"],
            &["Romper", "1", "1", "1", "1"],
            &[DEFAULT_VARIANT],
        );
        assert_eq!(tags, vec!["2 Plus", "3 Plus", "6 Plus", "All Ages"]);
    }

    #[test]
    fn threshold_pass_through_needs_numeric_one() {
        let with_two = run(&["Title", "4 Plus"], &["Romper", "2"], &[DEFAULT_VARIANT]);
        assert!(with_two.is_empty());
        let with_one = run(&["Title", "4 Plus"], &["Romper", "1"], &[DEFAULT_VARIANT]);
        assert_eq!(with_one, vec!["4 Plus"]);
    }

    #[test]
    fn pass_through_text_contributes_literal_values() {
        let tags = run(
            &["Title", "Season", "Campaign", "Make"],
            &["Romper", "Summer 25", "Launch", "Knit"],
            &[DEFAULT_VARIANT],
        );
        assert_eq!(tags, vec!["Summer 25", "Launch", "Knit"]);
    }

    #[test]
    fn active_toy_sizes_become_tags() {
        let tags = run(&["Title"], &["Stacker"], &["6-12M Toys", "One Size"]);
        assert_eq!(tags, vec!["6-12M Toys"]);
    }

    #[test]
    fn drop_active_flag_is_case_insensitive() {
        let tags = run(&["Title", "DROP_ACTIVE"], &["Romper", "True"], &[DEFAULT_VARIANT]);
        assert_eq!(tags, vec!["DROP_ACTIVE"]);
    }

    #[test]
    fn age_groups_follow_gender_tags() {
        let tags = run(
            &["Title", "Boys"],
            &["Romper", "1"],
            &["NB", "0-3M", "6-9M"],
        );
        assert_eq!(tags, vec!["Boy", "Boy 0-3m", "Boy 6-12m"]);
    }

    #[test]
    fn age_groups_skip_ungendered_rows() {
        let tags = run(&["Title", "Unisex"], &["Romper", "1"], &["0-3M"]);
        assert_eq!(tags, vec!["Unisex"]);
    }

    #[test]
    fn age_group_normalization_handles_dashes_and_spaces() {
        let tags = run(&["Title", "Girls"], &["Romper", "1"], &["12 \u{2013} 18 M"]);
        assert_eq!(tags, vec!["Girl", "Girl 1-2y"]);
    }

    #[test]
    fn tags_never_repeat_and_keep_first_seen_order() {
        let tags = run(
            &["Title", "Brand Name", "Subcategory", "Boys", "*Boys + Unisex*"],
            &["Romper", "Rompers", "Rompers", "1", "1"],
            &[DEFAULT_VARIANT],
        );
        assert_eq!(tags, vec!["Rompers", "Boy", "Unisex"]);
    }
}
