//! Dish price handling.
//!
//! Prices are fixed-point decimals with at most 8 digits total and 2 decimal
//! places, stored as NUMERIC(8,2) and carried across the query boundary as
//! text. `normalize` validates a client-supplied value and rewrites it with
//! exactly two decimal places, so "12" and "12.5" become "12.00" and "12.50".

use super::error::DomainError;

const MAX_DIGITS: usize = 8;
const DECIMAL_PLACES: usize = 2;

pub fn normalize(raw: &str) -> Result<String, DomainError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DomainError::validation("price must not be empty"));
    }

    let (integer, fraction) = match value.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (value, ""),
    };

    if integer.is_empty() || !integer.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::validation(format!(
            "price `{value}` is not a decimal number"
        )));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::validation(format!(
            "price `{value}` is not a decimal number"
        )));
    }
    if fraction.len() > DECIMAL_PLACES {
        return Err(DomainError::validation(format!(
            "price `{value}` has more than {DECIMAL_PLACES} decimal places"
        )));
    }

    let integer = integer.trim_start_matches('0');
    let integer = if integer.is_empty() { "0" } else { integer };
    if integer.len() + DECIMAL_PLACES > MAX_DIGITS {
        return Err(DomainError::validation(format!(
            "price `{value}` exceeds {MAX_DIGITS} total digits"
        )));
    }

    let mut fraction = fraction.to_string();
    while fraction.len() < DECIMAL_PLACES {
        fraction.push('0');
    }

    Ok(format!("{integer}.{fraction}"))
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn pads_missing_decimal_places() {
        assert_eq!(normalize("12").unwrap(), "12.00");
        assert_eq!(normalize("12.5").unwrap(), "12.50");
        assert_eq!(normalize("12.50").unwrap(), "12.50");
    }

    #[test]
    fn strips_leading_zeros() {
        assert_eq!(normalize("007.10").unwrap(), "7.10");
        assert_eq!(normalize("0").unwrap(), "0.00");
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(normalize("").is_err());
        assert!(normalize("abc").is_err());
        assert!(normalize("1.234").is_err());
        assert!(normalize("12,50").is_err());
        assert!(normalize(".50").is_err());
        assert!(normalize("-1.00").is_err());
    }

    #[test]
    fn enforces_total_digit_budget() {
        // six integer digits plus two decimals fits the NUMERIC(8,2) budget
        assert_eq!(normalize("999999.99").unwrap(), "999999.99");
        assert!(normalize("1000000.00").is_err());
    }
}
