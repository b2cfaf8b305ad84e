//! Field-level cleaners mapping raw CSV values to SQL literals.
//!
//! Every function here is pure and total: malformed input never errors, it
//! degrades to `NULL` (decimals: `0`). Corrupted source data is therefore
//! indistinguishable from legitimately absent data in the output — input
//! quality has to be checked out of band before running the conversion.
//!
//! All returned strings are ready to be placed verbatim inside a VALUES
//! tuple: `NULL`, a single-quoted literal with embedded quotes doubled, a
//! bare numeric literal, or a `'...'::jsonb` cast.

use crate::models::AppliedDiscount;

/// SQL NULL literal.
pub const NULL: &str = "NULL";

/// Source data's convention for "not applicable", treated as absent.
pub const NOT_APPLICABLE: &str = "n.a";

/// Quote a string for SQL, doubling embedded single quotes.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// True when the value is absent, empty, or the `n.a` sentinel.
fn is_blank(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_empty() || v == NOT_APPLICABLE,
    }
}

/// Clean free text into a quoted literal, or `NULL` when blank.
pub fn clean_text(value: Option<&str>) -> String {
    match value {
        Some(v) if !is_blank(Some(v)) => quote(v),
        _ => NULL.to_string(),
    }
}

/// Strip identifier numbers (CPF, RG, CEP) down to their digits.
///
/// Blank input, or input with no digits at all, becomes `NULL`.
pub fn clean_digits(value: Option<&str>) -> String {
    let raw = match value {
        Some(v) if !is_blank(Some(v)) => v,
        _ => return NULL.to_string(),
    };
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        NULL.to_string()
    } else {
        quote(&digits)
    }
}

/// Convert a `DD/MM/YYYY` date to a quoted `YYYY-MM-DD` literal.
///
/// Day and month are zero-padded to two digits. Anything that does not
/// split into exactly three all-digit segments becomes `NULL`; the triple
/// is not checked against a calendar.
pub fn convert_date(value: Option<&str>) -> String {
    let raw = match value {
        Some(v) if !is_blank(Some(v)) => v,
        _ => return NULL.to_string(),
    };
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return NULL.to_string();
    }
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return NULL.to_string();
    }
    format!("'{}-{:0>2}-{:0>2}'", parts[2], parts[1], parts[0])
}

/// Clean a decimal value with a comma or period separator into a bare
/// numeric literal.
///
/// Unlike the other cleaners this defaults to `0`, never `NULL`: the
/// financial columns are non-nullable in the destination table.
pub fn clean_decimal(value: Option<&str>) -> String {
    let raw = match value {
        Some(v) if !is_blank(Some(v)) => v,
        _ => return "0".to_string(),
    };
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "0".to_string())
}

/// Normalize a gender code: only `M` or `F` survive, anything else is `NULL`.
pub fn clean_gender(value: Option<&str>) -> String {
    let raw = match value {
        Some(v) if !is_blank(Some(v)) => v,
        _ => return NULL.to_string(),
    };
    let code = raw.trim().to_uppercase();
    match code.as_str() {
        "M" | "F" => quote(&code),
        _ => NULL.to_string(),
    }
}

/// Normalize a school name to a lowercase underscore slug.
pub fn school_slug(value: Option<&str>) -> String {
    match value {
        Some(v) if !is_blank(Some(v)) => quote(&v.to_lowercase().replace(' ', "_")),
        _ => NULL.to_string(),
    }
}

/// Build the `applied_discounts` JSON literal.
///
/// The percentage goes through [`clean_decimal`] first; an empty code or a
/// zero percentage yields the empty-array literal. Otherwise a one-element
/// array is serialized (non-ASCII characters kept as-is), single quotes are
/// doubled, and the result is cast to jsonb.
pub fn discounts_json(
    code: Option<&str>,
    description: Option<&str>,
    percentage: Option<&str>,
) -> String {
    let percentage: f64 = clean_decimal(percentage).parse().unwrap_or(0.0);
    let code = code.unwrap_or("");
    if code.is_empty() || percentage == 0.0 {
        return "'[]'::jsonb".to_string();
    }

    let name = match description {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => format!("Desconto {}", code),
    };

    let discount = AppliedDiscount::new(code, name, percentage);
    let json = serde_json::to_string(&vec![discount]).unwrap_or_else(|_| "[]".to_string());
    format!("'{}'::jsonb", json.replace('\'', "''"))
}
