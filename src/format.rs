//! Pure helpers turning raw keystrokes into normalized and display forms.

/// Strip every non-digit character.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Digits of a postal code, at most 8.
pub fn normalize_postal_code(value: &str) -> String {
    let mut digits = digits_only(value);
    digits.truncate(8);
    digits
}

/// Display form of a postal code: `NNNNN-NNN` once more than 5 digits are
/// present, the bare digit run otherwise.
pub fn format_postal_code(value: &str) -> String {
    let digits = normalize_postal_code(value);
    if digits.len() <= 5 {
        digits
    } else {
        format!("{}-{}", &digits[..5], &digits[5..])
    }
}

/// Digits of a phone number, at most 11.
pub fn normalize_phone(value: &str) -> String {
    let mut digits = digits_only(value);
    digits.truncate(11);
    digits
}

/// Progressive phone mask: `(DD) NNNN-NNNN` for 10 digits,
/// `(DD) NNNNN-NNNN` for 11, partial prefixes while typing.
pub fn format_phone(value: &str) -> String {
    let digits = normalize_phone(value);
    match digits.len() {
        0 => String::new(),
        1..=2 => format!("({digits}"),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}

/// Trimmed, upper-cased state code, at most 2 characters. No digit
/// filtering.
pub fn normalize_state_code(value: &str) -> String {
    value.trim().to_uppercase().chars().take(2).collect()
}
