pub const BOM: &str = "\u{feff}";
pub const DELIMITER: char = ';';

fn escape(field: &str) -> String {
    if field.contains([DELIMITER, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Appends one `;`-separated line terminated by CRLF.
pub fn push_line<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut first = true;
    for field in fields {
        if !first {
            out.push(DELIMITER);
        }
        first = false;
        out.push_str(&escape(field.as_ref()));
    }
    out.push_str("\r\n");
}
