//! Reading a typed answer.
//!
//! Answers come in as raw text from an input box. They are read leniently:
//! leading whitespace is skipped and the longest numeric prefix is taken, so
//! `"4 "` and `"4x"` both read as 4. Text with no numeric prefix reads as
//! nothing and counts as a wrong answer.

/// Parse the leading number of `raw`.
///
/// Accepts an optional sign, digits with an optional fraction, an optional
/// exponent, and `Infinity`.
#[must_use]
pub fn parse_answer(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if text[end..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_answer("4"), Some(4.0));
        assert_eq!(parse_answer("-4"), Some(-4.0));
        assert_eq!(parse_answer("+7"), Some(7.0));
        assert_eq!(parse_answer("2.5"), Some(2.5));
        assert_eq!(parse_answer(".5"), Some(0.5));
        assert_eq!(parse_answer("5."), Some(5.0));
        assert_eq!(parse_answer("1e2"), Some(100.0));
        assert_eq!(parse_answer("1.5E-1"), Some(0.15));
    }

    #[test]
    fn test_lenient_prefix() {
        assert_eq!(parse_answer("   6"), Some(6.0));
        assert_eq!(parse_answer("6   "), Some(6.0));
        assert_eq!(parse_answer("4x"), Some(4.0));
        assert_eq!(parse_answer("3e"), Some(3.0));
        assert_eq!(parse_answer("3e+"), Some(3.0));
        assert_eq!(parse_answer("1.2.3"), Some(1.2));
    }

    #[test]
    fn test_infinity() {
        assert_eq!(parse_answer("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_answer("-Infinityyy"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(parse_answer("abc"), None);
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("   "), None);
        assert_eq!(parse_answer("-"), None);
        assert_eq!(parse_answer("."), None);
        assert_eq!(parse_answer("x = 4"), None);
        assert_eq!(parse_answer("NaN"), None);
    }
}
