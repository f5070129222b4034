use chrono::NaiveDate;

/// Date layout used by the connections export, e.g. `07 Mar 2021`.
pub(crate) const CONNECTED_ON_FORMAT: &str = "%d %b %Y";

const EXCLUDED_COMPANY_MARKERS: [&str; 2] = ["freelance", "self-employed"];

/// Lower-cases a header and collapses every run of non-alphanumeric
/// characters into a single `_`, so `"Connected On"` becomes `connected_on`.
pub(crate) fn clean_column_name(value: &str) -> String {
    let stripped = strip_invisible(value);
    let mut cleaned = String::with_capacity(stripped.len());
    let mut pending_separator = false;

    for c in stripped.trim().chars() {
        if c.is_alphanumeric() {
            if pending_separator && !cleaned.is_empty() {
                cleaned.push('_');
            }
            pending_separator = false;
            cleaned.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    cleaned
}

/// Collapses internal whitespace while keeping the original casing.
pub(crate) fn clean_value(value: &str) -> String {
    strip_invisible(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the employer is a freelance or self-employed placeholder rather
/// than an actual company.
pub(crate) fn is_excluded_company(company: &str) -> bool {
    let lowered = company.to_lowercase();
    EXCLUDED_COMPANY_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

pub(crate) fn parse_connected_on(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), CONNECTED_ON_FORMAT).ok()
}

fn strip_invisible(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "")
}
