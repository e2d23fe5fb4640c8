//! Format checks shared by every service so the façade and the ledger reject
//! the same inputs.

use crate::{CoreError, CoreResult, FieldErrors};

const WILDCARD_SEATS: [&str; 2] = ["ALL", "*"];
const MAX_SEAT_LEN: usize = 5;

/// Converts a caller-supplied id into a positive `u32`.
pub fn positive_id(field: &str, raw: i64) -> CoreResult<u32> {
    match u32::try_from(raw) {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::invalid(field, format!("{} must be a positive integer", field))),
    }
}

/// Like [`positive_id`] but records the problem instead of returning early.
pub fn check_positive_id(errors: &mut FieldErrors, field: &str, raw: i64) -> Option<u32> {
    match positive_id(field, raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, format!("{} must be a positive integer", field));
            None
        }
    }
}

pub fn check_text(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{} must not be blank", field));
    }
}

/// Uppercases and checks a seat number such as `12A`: row digits followed by a
/// column letter A-F, at most five characters, no wildcard tokens.
pub fn normalize_seat_number(raw: &str) -> Result<String, String> {
    let seat = raw.trim().to_uppercase();

    if seat.is_empty() {
        return Err("seat_number must not be blank".to_string());
    }
    if seat.len() > MAX_SEAT_LEN {
        return Err(format!("seat_number must be at most {} characters", MAX_SEAT_LEN));
    }
    if WILDCARD_SEATS.contains(&seat.as_str()) {
        return Err("seat_number must name a single seat".to_string());
    }

    if !seat.is_ascii() {
        return Err("seat_number must be a row number followed by a column A-F, e.g. 12A".to_string());
    }

    let (row, column) = seat.split_at(seat.len() - 1);
    let row_ok = !row.is_empty() && row.chars().all(|c| c.is_ascii_digit());
    let column_ok = matches!(column, "A" | "B" | "C" | "D" | "E" | "F");
    if !row_ok || !column_ok {
        return Err("seat_number must be a row number followed by a column A-F, e.g. 12A".to_string());
    }

    Ok(seat)
}

pub fn seat_number(raw: &str) -> CoreResult<String> {
    normalize_seat_number(raw).map_err(|msg| CoreError::invalid("seat_number", msg))
}

/// Reservation codes are six uppercase letters or digits; input is uppercased first.
pub fn reservation_code(raw: &str) -> CoreResult<String> {
    let code = raw.trim().to_uppercase();
    if code.len() == 6 && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        Ok(code)
    } else {
        Err(CoreError::invalid(
            "reservation_code",
            "reservation_code must be 6 letters or digits",
        ))
    }
}

/// Payment ids look like `PAY123456`.
pub fn payment_id(raw: &str) -> CoreResult<String> {
    let id = raw.trim();
    let valid = id
        .strip_prefix("PAY")
        .map(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);
    if valid {
        Ok(id.to_string())
    } else {
        Err(CoreError::invalid("payment_id", "payment_id must look like PAY123456"))
    }
}

/// Two uppercase letters, a dash, four digits: `AA-1234`.
pub fn is_flight_number(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2] == b'-'
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_numbers() {
        assert_eq!(normalize_seat_number("12a").unwrap(), "12A");
        assert_eq!(normalize_seat_number(" 1F ").unwrap(), "1F");
        assert!(normalize_seat_number("ALL").is_err());
        assert!(normalize_seat_number("*").is_err());
        assert!(normalize_seat_number("1G").is_err());
        assert!(normalize_seat_number("A1").is_err());
        assert!(normalize_seat_number("12345A").is_err());
        assert!(normalize_seat_number("").is_err());
    }

    #[test]
    fn test_positive_ids() {
        assert_eq!(positive_id("airplane_id", 7).unwrap(), 7);
        assert!(positive_id("airplane_id", 0).is_err());
        assert!(positive_id("airplane_id", -3).is_err());
        assert!(positive_id("airplane_id", i64::MAX).is_err());
    }

    #[test]
    fn test_codes_and_ids() {
        assert_eq!(reservation_code("ab12cd").unwrap(), "AB12CD");
        assert!(reservation_code("AB12C").is_err());
        assert!(reservation_code("AB-2CD").is_err());

        assert!(payment_id("PAY123456").is_ok());
        assert!(payment_id("PAY12345").is_err());
        assert!(payment_id("pay123456").is_err());
    }

    #[test]
    fn test_flight_numbers_and_emails() {
        assert!(is_flight_number("AV-1234"));
        assert!(!is_flight_number("av-1234"));
        assert!(!is_flight_number("AV1234"));
        assert!(!is_flight_number("AV-123"));

        assert!(is_email("ana@example.com"));
        assert!(!is_email("ana.example.com"));
        assert!(!is_email("ana@localhost"));
        assert!(!is_email("a b@example.com"));
    }
}
