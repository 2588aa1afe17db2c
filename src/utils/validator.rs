use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use url::Url;

use crate::errors::{Error, Result};

pub type FieldResult<T> = core::result::Result<T, String>;

static CVR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("cvr pattern"));
static TILLADELSESNR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]+$").expect("tilladelsesnr pattern"));
static VEJMAN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://vejman\.vd\.dk/permissions/update\.jsp\?caseid=[0-9]+")
        .expect("vejman link pattern")
});
static DAY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,2}-[0-9]{1,2}-[0-9]{4}$").expect("date pattern"));
static YEAR_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$").expect("date pattern"));

/// Collects every failing field so the caller gets all messages at once.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check<T>(&mut self, result: FieldResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.0.push(message);
                None
            }
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.0))
        }
    }
}

pub fn validate_cvr(value: &str) -> FieldResult<String> {
    let value = value.trim();
    if CVR.is_match(value) {
        Ok(value.to_string())
    } else {
        Err("CVR skal være præcis 8 cifre.".to_string())
    }
}

pub fn validate_tilladelsesnr(value: &str) -> FieldResult<String> {
    let value = value.trim();
    if TILLADELSESNR.is_match(value) {
        Ok(value.to_string())
    } else {
        Err("Tilladelsesnr skal være på formateret som 24-01234.".to_string())
    }
}

/// Accepts both `12,5` and `12.5`.
pub fn parse_decimal(value: &str, field: &str) -> FieldResult<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{field} skal være et gyldigt tal."))
}

/// Accepts `dd-mm-yyyy` and `yyyy-mm-dd`.
pub fn parse_date(value: &str, field: &str) -> FieldResult<NaiveDate> {
    let value = value.trim();
    let parsed = if DAY_FIRST.is_match(value) {
        NaiveDate::parse_from_str(value, "%d-%m-%Y").ok()
    } else if YEAR_FIRST.is_match(value) {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        None
    };
    parsed.ok_or_else(|| format!("{field} skal skrives som dag-måned-år i tal, f.eks. 31-12-2024."))
}

pub fn parse_optional_int(value: Option<&str>, field: &str) -> FieldResult<Option<i64>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("{field} skal være et heltal.")),
    }
}

pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> FieldResult<()> {
    if end < start {
        Err("Slutdato kan ikke ligge før startdato.".to_string())
    } else {
        Ok(())
    }
}

/// Returns the Vejman case id of a permit link.
pub fn validate_vejman_link(value: &str) -> FieldResult<i64> {
    let value = value.trim();
    if !VEJMAN_LINK.is_match(value) {
        return Err("Link til tilladelse skal være direkte til vejman, f.eks. https://vejman.vd.dk/permissions/update.jsp?caseid=12345678.".to_string());
    }
    let url = Url::parse(value).map_err(|e| format!("Ugyldigt link til tilladelse: {e}"))?;
    let case_id = url
        .query_pairs()
        .find(|(key, _)| key == "caseid")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| "Link til tilladelse mangler 'caseid' parameter.".to_string())?;
    case_id
        .parse::<i64>()
        .map_err(|_| "Link til tilladelse har et ugyldigt 'caseid'.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cvr_must_be_eight_digits() {
        assert_eq!(validate_cvr("12345678"), Ok("12345678".to_string()));
        assert_eq!(validate_cvr(" 87654321 "), Ok("87654321".to_string()));
        for bad in ["1234567", "123456789", "1234567a", "", "١٢٣٤٥٦٧٨", "1234 678"] {
            assert_eq!(
                validate_cvr(bad),
                Err("CVR skal være præcis 8 cifre.".to_string()),
                "{bad}"
            );
        }
    }

    #[test]
    fn decimals_accept_comma_or_dot() {
        assert_eq!(parse_decimal("12,5", "Meter"), Ok(12.5));
        assert_eq!(parse_decimal("12.5", "Meter"), Ok(12.5));
        assert_eq!(parse_decimal(" 7 ", "Meter"), Ok(7.0));
        assert_eq!(
            parse_decimal("tolv", "Enhedspris"),
            Err("Enhedspris skal være et gyldigt tal.".to_string())
        );
        assert!(parse_decimal("NaN", "Meter").is_err());
        assert!(parse_decimal("inf", "Meter").is_err());
    }

    #[test]
    fn both_date_formats_normalize() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(parse_date("31-12-2024", "Startdato"), Ok(expected));
        assert_eq!(parse_date("2024-12-31", "Startdato"), Ok(expected));
        assert_eq!(expected.to_string(), "2024-12-31");
    }

    #[test]
    fn other_date_formats_fail() {
        for bad in ["31/12/2024", "31-12-24", "2024-13-01", "32-01-2024", "12-31-2024", "i går"] {
            assert_eq!(
                parse_date(bad, "Slutdato"),
                Err("Slutdato skal skrives som dag-måned-år i tal, f.eks. 31-12-2024.".to_string()),
                "{bad}"
            );
        }
    }

    #[test]
    fn vejman_link_yields_case_id() {
        assert_eq!(
            validate_vejman_link("https://vejman.vd.dk/permissions/update.jsp?caseid=12345678"),
            Ok(12345678)
        );
        assert!(validate_vejman_link("https://example.com/update.jsp?caseid=1").is_err());
        assert!(validate_vejman_link("https://vejman.vd.dk/permissions/update.jsp?id=1").is_err());
    }

    #[test]
    fn tilladelsesnr_format() {
        assert!(validate_tilladelsesnr("24-01234").is_ok());
        assert!(validate_tilladelsesnr("2401234").is_err());
    }

    #[test]
    fn errors_accumulate() {
        let mut errors = FieldErrors::new();
        errors.check(validate_cvr("1"));
        errors.check(parse_decimal("x", "Meter"));
        errors.check(parse_date("2024-01-01", "Startdato"));
        match errors.into_result() {
            Err(Error::Validation(messages)) => assert_eq!(messages.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
