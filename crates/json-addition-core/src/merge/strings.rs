use crate::number::{Number, SIGNIFICANT_DIGITS};

/// Combining circumflex accent below, appended after every character of a
/// subtracted substring.
pub const SUBTRACTION_MARK: char = '\u{32D}';

/// A string read as a leading number followed by a textual unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Quantity<'a> {
    pub(super) amount: f64,
    pub(super) unit: &'a str,
}

impl<'a> Quantity<'a> {
    /// Splits `text` at the end of its leading run of digits and dots.
    ///
    /// The amount is read from that run the way a float literal is: digits
    /// with at most one dot, anything after a second dot ignored. Returns
    /// `None` when the run holds no digit before a second dot.
    pub(super) fn parse(text: &'a str) -> Option<Self> {
        let run = text.bytes().take_while(|b| b.is_ascii_digit() || *b == b'.').count();
        let (prefix, unit) = text.split_at(run);
        let literal = match prefix.match_indices('.').nth(1) {
            Some((second_dot, _)) => &prefix[..second_dot],
            None => prefix,
        };
        if !literal.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        let amount: f64 = literal.parse().ok()?;
        amount.is_finite().then_some(Self { amount, unit })
    }
}

/// Adds or subtracts two strings.
///
/// Quantities with the same unit combine numerically and keep the unit;
/// anything else joins as `"a, b"` or, when subtracting, marks the first
/// occurrence of `b` inside `a`.
pub(super) fn combine_strings(a: &str, b: &str, subtract: bool) -> String {
    match (Quantity::parse(a), Quantity::parse(b)) {
        (Some(lhs), Some(rhs)) if lhs.unit == rhs.unit => {
            let amount = if subtract { lhs.amount - rhs.amount } else { lhs.amount + rhs.amount };
            match Number::new(amount) {
                Ok(number) => format!("{}{}", number.round_significant(SIGNIFICANT_DIGITS), lhs.unit),
                Err(_) => join(a, b),
            }
        }
        _ if subtract => mark_subtracted(a, b),
        _ => join(a, b),
    }
}

/// Joins two textual forms as `"a, b"`.
pub(super) fn join(a: &str, b: &str) -> String {
    format!("{a}, {b}")
}

/// Marks the first literal occurrence of `needle` in `haystack`.
///
/// The text is not removed; each of its characters is followed by
/// [`SUBTRACTION_MARK`]. Without an occurrence the haystack is returned as is.
pub(super) fn mark_subtracted(haystack: &str, needle: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    let mut marked = String::with_capacity(needle.len() * 3);
    for ch in needle.chars() {
        marked.push(ch);
        marked.push(SUBTRACTION_MARK);
    }
    haystack.replacen(needle, &marked, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_splits_number_and_unit() {
        let q = Quantity::parse("30 seconds").unwrap();
        assert_eq!(q.amount, 30.0);
        assert_eq!(q.unit, " seconds");

        let q = Quantity::parse("2.5kg").unwrap();
        assert_eq!(q.amount, 2.5);
        assert_eq!(q.unit, "kg");

        let q = Quantity::parse("42").unwrap();
        assert_eq!(q.unit, "");
    }

    #[test]
    fn quantity_ignores_digits_after_second_dot() {
        let q = Quantity::parse("1.2.3 build").unwrap();
        assert_eq!(q.amount, 1.2);
        assert_eq!(q.unit, " build");
    }

    #[test]
    fn non_numeric_prefixes_are_rejected() {
        assert!(Quantity::parse("hello").is_none());
        assert!(Quantity::parse(".").is_none());
        assert!(Quantity::parse("").is_none());
        assert!(Quantity::parse("-5 s").is_none());
    }

    #[test]
    fn leading_dot_reads_as_fraction() {
        assert_eq!(Quantity::parse(".5x").unwrap().amount, 0.5);
    }

    #[test]
    fn quantities_with_same_unit_combine() {
        assert_eq!(combine_strings("30 seconds", "20 seconds", false), "50 seconds");
        assert_eq!(combine_strings("30 seconds", "20 seconds", true), "10 seconds");
        assert_eq!(combine_strings("0.1 l", "0.2 l", false), "0.3 l");
        assert_eq!(combine_strings("5", "7", true), "-2");
    }

    #[test]
    fn tiny_quantities_render_in_exponent_form() {
        assert_eq!(combine_strings("0.0000001 s", "0.0000001 s", false), "2e-7 s");
        assert_eq!(combine_strings("0.000001 s", "0.000001 s", false), "0.000002 s");
    }

    #[test]
    fn different_units_join() {
        assert_eq!(combine_strings("30 seconds", "20 minutes", false), "30 seconds, 20 minutes");
    }

    #[test]
    fn plain_strings_join_on_addition() {
        assert_eq!(combine_strings("hello", "world", false), "hello, world");
    }

    #[test]
    fn subtraction_marks_first_occurrence_only() {
        assert_eq!(mark_subtracted("hello world", "world"), "hello w\u{32D}o\u{32D}r\u{32D}l\u{32D}d\u{32D}");
        assert_eq!(mark_subtracted("hello world", "hello"), "h\u{32D}e\u{32D}l\u{32D}l\u{32D}o\u{32D} world");
        assert_eq!(mark_subtracted("abab", "ab"), "a\u{32D}b\u{32D}ab");
    }

    #[test]
    fn subtraction_without_occurrence_keeps_text() {
        assert_eq!(combine_strings("hello", "world", true), "hello");
        assert_eq!(mark_subtracted("hello", ""), "hello");
    }
}
