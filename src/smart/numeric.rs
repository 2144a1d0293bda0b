// Lenient number parsing for smartctl values

/// Reads the leading integer of `text`, accepting thousands separators.
///
/// `"500,107,862,016 bytes [500 GB]"` gives 500107862016, `"30%"` gives 30,
/// `"1234h+05m"` gives 1234. A separator only counts when a digit follows it.
/// Returns None when there is no leading digit or the value overflows.
pub fn leading_number(text: &str) -> Option<u64> {
    let mut value: u64 = 0;
    let mut seen_digit = false;
    let mut chars = text.trim_start().chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(d) = c.to_digit(10) {
            value = value.checked_mul(10)?.checked_add(u64::from(d))?;
            seen_digit = true;
        } else if seen_digit
            && is_group_separator(c)
            && chars.peek().is_some_and(|n| n.is_ascii_digit())
        {
            continue;
        } else {
            break;
        }
    }

    seen_digit.then_some(value)
}

/// Parses a flag word printed either as hex (`0x04`) or decimal.
pub fn parse_flag(text: &str) -> Option<u64> {
    let text = text.trim();
    match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn is_group_separator(c: char) -> bool {
    matches!(c, ',' | '.' | '\'' | '\u{a0}' | '\u{202f}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_grouped_numbers() {
        assert_eq!(leading_number("500,107,862,016 bytes [500 GB]"), Some(500_107_862_016));
        assert_eq!(leading_number("1.000.204.886.016 bytes"), Some(1_000_204_886_016));
        assert_eq!(leading_number("  12,345,678 [6.32 TB]"), Some(12_345_678));
    }

    #[test]
    fn stops_at_first_non_digit() {
        assert_eq!(leading_number("30%"), Some(30));
        assert_eq!(leading_number("1234h+05m+10.123s"), Some(1234));
        assert_eq!(leading_number("32 (Min/Max 20/45)"), Some(32));
        assert_eq!(leading_number("7200 rpm"), Some(7200));
        assert_eq!(leading_number("15,"), Some(15));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("Solid State Device"), None);
        assert_eq!(leading_number("99999999999999999999999"), None);
    }

    #[test]
    fn flags_in_hex_or_decimal() {
        assert_eq!(parse_flag("0x00"), Some(0));
        assert_eq!(parse_flag(" 0x04 "), Some(4));
        assert_eq!(parse_flag("2"), Some(2));
        assert_eq!(parse_flag("0xzz"), None);
    }
}
