/// Strip a raw price cell down to digits, `.` and `-`. An integer residue is
/// re-rendered bare ("₹1,299 " → "1299"); a residue that only parses as a
/// float-ish string is returned untouched; anything else degrades to empty.
pub fn clean_price(raw: &str) -> String {
    let residue: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if residue.is_empty() {
        return String::new();
    }
    match residue.parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => residue,
    }
}

/// Round a cleaned price up to the next value ending in 9.
///
/// For positive P: a price whose integer part already ends in 9 is returned
/// as that integer part, even when P has a fractional tail, so the result
/// is not strictly greater in that one case. Existing catalogs depend on
/// that exact branch; do not "fix" it. Otherwise round to the nearest
/// multiple of 10, step back to the preceding 9, and bump by 10 whenever the
/// result is not strictly greater than P. Never below 0.
///
/// Empty input stays empty; unparseable or non-positive input passes through
/// verbatim.
pub fn round_up_to_nine(price: &str) -> String {
    if price.trim().is_empty() {
        return String::new();
    }
    let p: f64 = match price.trim().parse() {
        Ok(v) => v,
        Err(_) => return price.to_string(),
    };
    if !(p > 0.0) {
        return price.to_string();
    }

    let int_part = p as i64;
    if int_part % 10 == 9 {
        return int_part.to_string();
    }

    let mut rounded = ((p + 5.0) / 10.0) as i64 * 10 - 1;
    if rounded as f64 <= p {
        rounded += 10;
    }
    if rounded < 0 {
        rounded = 0;
    }
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_price_strips_currency_noise() {
        assert_eq!(clean_price("₹1,299"), "1299");
        assert_eq!(clean_price(" 999 "), "999");
        assert_eq!(clean_price("Rs 450/-"), "450-");
        assert_eq!(clean_price("1050.50"), "1050.50");
        assert_eq!(clean_price("-80"), "-80");
        assert_eq!(clean_price("free"), "");
        assert_eq!(clean_price(""), "");
    }

    #[test]
    fn rounds_up_to_the_next_nine() {
        assert_eq!(round_up_to_nine("1000"), "1009");
        assert_eq!(round_up_to_nine("1005"), "1009");
        assert_eq!(round_up_to_nine("995"), "999");
        assert_eq!(round_up_to_nine("4"), "9");
        assert_eq!(round_up_to_nine("991"), "999");
    }

    #[test]
    fn nine_endings_are_kept_even_when_not_greater() {
        assert_eq!(round_up_to_nine("999"), "999");
        assert_eq!(round_up_to_nine("1019"), "1019");
        // fractional tail past a 9-ending integer part: documented quirk,
        // result is not strictly greater
        assert_eq!(round_up_to_nine("999.5"), "999");
    }

    #[test]
    fn idempotent_once_ending_in_nine() {
        for p in ["1000", "995", "4", "123456"] {
            let once = round_up_to_nine(p);
            assert_eq!(round_up_to_nine(&once), once);
        }
    }

    #[test]
    fn result_is_strictly_greater_and_nine_ending() {
        for p in 1..500i64 {
            if p % 10 == 9 {
                continue;
            }
            let out: i64 = round_up_to_nine(&p.to_string()).parse().unwrap();
            assert!(out > p, "{} -> {}", p, out);
            assert_eq!(out % 10, 9, "{} -> {}", p, out);
        }
    }

    #[test]
    fn degenerate_inputs_pass_through() {
        assert_eq!(round_up_to_nine(""), "");
        assert_eq!(round_up_to_nine("  "), "");
        assert_eq!(round_up_to_nine("0"), "0");
        assert_eq!(round_up_to_nine("-80"), "-80");
        assert_eq!(round_up_to_nine("n/a"), "n/a");
    }
}
