use chrono::NaiveDate;

pub const DISPLAY_DATE: &str = "%d-%m-%Y";

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DISPLAY_DATE).to_string())
        .unwrap_or_default()
}

/// Danish decimal comma, at most three decimals, trailing zeros trimmed.
pub fn format_decimal(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return String::new();
    };
    let fixed = format!("{:.3}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    trimmed.replace('.', ",")
}
