use std::sync::LazyLock;

use regex::Regex;

use crate::format::{normalize_phone, normalize_postal_code, normalize_state_code};
use crate::record::FormRecord;

static EMAIL_REG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static STATE_REG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

fn is_valid_name(value: &str) -> bool {
    value.trim().chars().count() >= 2
}

/// Check every rule in a fixed order and collect the violation messages.
///
/// Only the first message is shown to the user, so the order here is what
/// makes that first message deterministic. The state field is rewritten with
/// its normalized form before being checked; the rewrite sticks even when
/// validation fails, since the persisted record depends on it.
pub fn validate_record(record: &mut FormRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_valid_name(&record.first_name) {
        errors.push("First name must have at least 2 characters.".to_string());
    }
    if !is_valid_name(&record.last_name) {
        errors.push("Last name must have at least 2 characters.".to_string());
    }
    if !EMAIL_REG.is_match(record.email.trim()) {
        errors.push("Invalid email address. Check the format.".to_string());
    }
    if normalize_postal_code(&record.zip_code).len() != 8 {
        errors.push("Invalid postal code. Enter 8 digits.".to_string());
    }

    record.state = normalize_state_code(&record.state);
    if !STATE_REG.is_match(&record.state) {
        errors.push("Invalid state code. Use 2 letters (e.g. SP).".to_string());
    }

    // phone is optional, but must be complete when present
    let phone = normalize_phone(&record.phone);
    if !(phone.is_empty() || phone.len() == 10 || phone.len() == 11) {
        errors.push("Invalid phone number. Use 10 or 11 digits with the area code.".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> FormRecord {
        FormRecord {
            first_name: "Maria".to_string(),
            last_name: "Silva".to_string(),
            email: "maria.silva@example.com".to_string(),
            phone: "(11) 98765-4321".to_string(),
            zip_code: "01310-100".to_string(),
            address_line1: "Avenida Paulista".to_string(),
            address_number: "1578".to_string(),
            address_complement: String::new(),
            district: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        }
    }

    #[test]
    fn valid_record_produces_no_errors() {
        let mut record = valid_record();
        assert!(validate_record(&mut record).is_empty());
    }

    #[test]
    fn first_name_error_comes_before_email_error() {
        let mut record = valid_record();
        record.first_name = " ".to_string();
        record.email = "not-an-email".to_string();

        let errors = validate_record(&mut record);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], "First name must have at least 2 characters.");
        assert_eq!(errors[1], "Invalid email address. Check the format.");
    }

    #[test]
    fn single_character_names_are_rejected() {
        let mut record = valid_record();
        record.last_name = "S".to_string();
        let errors = validate_record(&mut record);
        assert_eq!(errors, vec!["Last name must have at least 2 characters."]);
    }

    #[test]
    fn email_needs_a_dotted_domain_and_no_whitespace() {
        for bad in ["maria@localhost", "maria silva@example.com", "@example.com", "maria@"] {
            let mut record = valid_record();
            record.email = bad.to_string();
            assert!(
                !validate_record(&mut record).is_empty(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn zip_code_must_have_exactly_eight_digits() {
        let mut record = valid_record();
        record.zip_code = "01310-10".to_string();
        let errors = validate_record(&mut record);
        assert_eq!(errors, vec!["Invalid postal code. Enter 8 digits."]);
    }

    #[test]
    fn state_is_normalized_in_place_even_when_validation_fails() {
        let mut record = valid_record();
        record.first_name = String::new();
        record.state = "  sp ".to_string();

        let errors = validate_record(&mut record);
        assert!(!errors.is_empty());
        assert_eq!(record.state, "SP");
    }

    #[test]
    fn numeric_state_codes_are_rejected() {
        let mut record = valid_record();
        record.state = "12".to_string();
        let errors = validate_record(&mut record);
        assert_eq!(errors, vec!["Invalid state code. Use 2 letters (e.g. SP)."]);
    }

    #[test]
    fn phone_is_optional() {
        let mut record = valid_record();
        record.phone = String::new();
        assert!(validate_record(&mut record).is_empty());
    }

    #[test]
    fn partial_phone_is_rejected() {
        let mut record = valid_record();
        record.phone = "(11) 9876-543".to_string();
        let errors = validate_record(&mut record);
        assert_eq!(
            errors,
            vec!["Invalid phone number. Use 10 or 11 digits with the area code."]
        );
    }

    #[test]
    fn ten_digit_phone_is_accepted() {
        let mut record = valid_record();
        record.phone = "(11) 9876-5432".to_string();
        assert!(validate_record(&mut record).is_empty());
    }
}
