//! Field checks applied before anything reaches the database.

use chrono::{DateTime, NaiveDate};

use super::DomainError;

pub const PHONE_NUMBER_MAX: usize = 15;
pub const AGENT_FIELD_MAX: usize = 100;
pub const CATEGORY_NAME_MAX: usize = 200;
pub const DISTRICT_NAME_MAX: usize = 100;
pub const CITY_NAME_MAX: usize = 200;
pub const ADDRESS_MAX: usize = 400;
pub const USERNAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;

/// Trimmed value, rejected when empty or longer than `max` characters.
pub fn required(field: &str, value: &str, max: usize) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    max_len(field, value, max)?;
    Ok(value.to_string())
}

/// Blank strings become `None`.
pub fn optional(field: &str, value: Option<String>, max: usize) -> Result<Option<String>, DomainError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            max_len(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Email address of at most `max` characters.
pub fn email(field: &str, value: &str, max: usize) -> Result<String, DomainError> {
    let value = required(field, value, max)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(value),
        _ => Err(DomainError::Validation(format!(
            "{} is not a valid email address",
            field
        ))),
    }
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn date(field: &str, value: Option<String>) -> Result<Option<String>, DomainError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(|d| Some(d.format("%Y-%m-%d").to_string()))
            .map_err(|_| DomainError::Validation(format!("{} must be YYYY-MM-DD", field))),
    }
}

/// RFC 3339 timestamp, normalized to UTC.
pub fn timestamp(field: &str, value: &str) -> Result<String, DomainError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&chrono::Utc).to_rfc3339())
        .map_err(|_| DomainError::Validation(format!("{} must be an RFC 3339 timestamp", field)))
}

pub fn non_negative(field: &str, value: f64) -> Result<f64, DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_becomes_none() {
        assert_eq!(optional("phone", Some("   ".into()), 15).unwrap(), None);
        assert_eq!(
            optional("phone", Some(" 555-0101 ".into()), 15).unwrap(),
            Some("555-0101".to_string())
        );
    }

    #[test]
    fn enforces_max_length() {
        let long = "1".repeat(16);
        assert!(matches!(
            optional("phone_number", Some(long), PHONE_NUMBER_MAX),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn required_rejects_empty() {
        assert!(required("address", "  ", ADDRESS_MAX).is_err());
    }

    #[test]
    fn checks_email_shape() {
        assert!(email("email", "jane@brokerage.test", AGENT_FIELD_MAX).is_ok());
        assert!(email("email", "jane", AGENT_FIELD_MAX).is_err());
        assert!(email("email", "@brokerage.test", AGENT_FIELD_MAX).is_err());
    }

    #[test]
    fn email_length_follows_caller_limit() {
        let long = format!("{}@brokerage.test", "j".repeat(120));
        assert!(email("email", &long, EMAIL_MAX).is_ok());
        assert!(email("email", &long, AGENT_FIELD_MAX).is_err());
    }

    #[test]
    fn normalizes_dates_and_timestamps() {
        assert_eq!(
            date("date_of_birth", Some("1990-04-01".into())).unwrap(),
            Some("1990-04-01".to_string())
        );
        assert!(date("date_of_birth", Some("01/04/1990".into())).is_err());
        assert_eq!(
            timestamp("deadline", "2026-11-01T09:00:00+02:00").unwrap(),
            "2026-11-01T07:00:00+00:00"
        );
        assert!(timestamp("deadline", "tomorrow").is_err());
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert!(non_negative("percentage", -1.0).is_err());
        assert!(non_negative("percentage", f64::NAN).is_err());
        assert_eq!(non_negative("percentage", 2.5).unwrap(), 2.5);
    }
}
