/// Saudi country prefix used for the canonical phone form.
pub const COUNTRY_PREFIX: &str = "966";

const MOBILE_DIGITS: usize = 9;

/// Canonicalizes a free-form phone string into a digits-only,
/// country-prefixed form. Never fails; inputs that do not match any known
/// shape degrade to their best-effort digit string (possibly empty).
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let stripped = digits.trim_start_matches('0');

    if let Some(rest) = stripped.strip_prefix(COUNTRY_PREFIX) {
        // Keep the prefix plus up to the next nine digits. Extra trailing
        // digits are dropped rather than the country code.
        let subscriber: String = rest.chars().take(MOBILE_DIGITS).collect();
        return format!("{COUNTRY_PREFIX}{subscriber}");
    }

    // Trunk form: a single leading zero followed by nine or more digits.
    // Runs of zeros were already stripped above, so only the exact
    // one-zero shape is rewritten here.
    if digits.starts_with('0') && !digits[1..].starts_with('0') && digits.len() > MOBILE_DIGITS {
        let subscriber: String = digits[1..].chars().take(MOBILE_DIGITS).collect();
        return format!("{COUNTRY_PREFIX}{subscriber}");
    }

    // Bare mobile number in the local range.
    if stripped.len() == MOBILE_DIGITS && stripped.starts_with('5') {
        return format!("{COUNTRY_PREFIX}{stripped}");
    }

    stripped.to_string()
}

/// Last nine digits of the normalized form. Weaker comparison key used as a
/// fallback when full canonical equality fails, which covers numbers stored
/// with inconsistent country-code prefixes.
pub fn last_nine(raw: &str) -> String {
    let canonical = normalize(raw);
    let skip = canonical.len().saturating_sub(MOBILE_DIGITS);
    canonical[skip..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_trunk_zero_number() {
        assert_eq!(normalize("0551234567"), "966551234567");
    }

    #[test]
    fn normalizes_international_prefix() {
        assert_eq!(normalize("+966551234567"), "966551234567");
        assert_eq!(normalize("00966551234567"), "966551234567");
    }

    #[test]
    fn normalizes_bare_mobile_number() {
        assert_eq!(normalize("551234567"), "966551234567");
    }

    #[test]
    fn strips_formatting_characters() {
        assert_eq!(normalize("+966 55-123 4567"), "966551234567");
    }

    #[test]
    fn truncates_extra_digits_after_country_prefix() {
        assert_eq!(normalize("9665512345678901"), "966551234567");
    }

    #[test]
    fn unrecognized_shape_degrades_to_digit_string() {
        assert_eq!(normalize("1234"), "1234");
        assert_eq!(normalize("1551234567"), "1551234567");
        assert_eq!(normalize("no digits here"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "0551234567",
            "+966551234567",
            "551234567",
            "9665512345678901",
            "1234",
            "",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn last_nine_returns_subscriber_digits() {
        assert_eq!(last_nine("0551234567"), "551234567");
        assert_eq!(last_nine("+966551234567"), "551234567");
        assert_eq!(last_nine("1234"), "1234");
    }
}
