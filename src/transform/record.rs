//! Row pipeline: one CSV row in, one ordered tuple of SQL literals out.

use crate::models::{ACADEMIC_YEAR, COLUMNS, STATUS_APPROVED};
use crate::parser::Record;

use super::fields::{
    clean_decimal, clean_digits, clean_gender, clean_text, convert_date, discounts_json,
    school_slug,
};

/// One row transformed into SQL literals, in destination column order.
#[derive(Debug, Clone)]
pub struct TransformedRecord {
    values: Vec<String>,
}

impl TransformedRecord {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// The literals in destination column order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Render as a parenthesized VALUES tuple.
    pub fn to_sql_tuple(&self) -> String {
        format!("({})", self.values.join(", "))
    }
}

fn field<'a>(row: &'a Record, key: &str) -> Option<&'a str> {
    row.get(key).map(String::as_str)
}

/// Transform one CSV row into a [`TransformedRecord`].
///
/// Returns `None` for structurally invalid rows: a blank `student_name`, or
/// a row that is literally the header line repeated inside the data (the
/// source export occasionally concatenates multiple files).
pub fn build_record(row: &Record) -> Option<TransformedRecord> {
    let student_name = field(row, "student_name").unwrap_or("");
    if student_name.is_empty() || student_name == "student_name" {
        return None;
    }

    // shift is lowercased and address_state uppercased before cleaning,
    // mirroring the source export's casing conventions
    let shift = field(row, "shift").map(str::to_lowercase);
    let state = field(row, "address_state").map(str::to_uppercase);

    let values = vec![
        clean_text(field(row, "student_name")),
        clean_digits(field(row, "student_cpf")),
        clean_text(field(row, "student_rg")),
        convert_date(field(row, "student_birth_date")),
        clean_gender(field(row, "student_gender")),
        school_slug(field(row, "student_escola")),
        clean_text(field(row, "series_id")),
        clean_text(field(row, "series_name")),
        clean_text(field(row, "track_id")),
        clean_text(field(row, "track_name")),
        clean_text(shift.as_deref()),
        clean_text(field(row, "guardian1_name")),
        clean_digits(field(row, "guardian1_cpf")),
        clean_text(field(row, "guardian1_phone")),
        clean_text(field(row, "guardian1_email")),
        clean_text(field(row, "guardian1_relationship")),
        clean_text(field(row, "guardian2_name")),
        clean_digits(field(row, "guardian2_cpf")),
        clean_text(field(row, "guardian2_phone")),
        clean_text(field(row, "guardian2_email")),
        clean_text(field(row, "guardian2_relationship")),
        clean_digits(field(row, "address_cep")),
        clean_text(field(row, "address_street")),
        clean_text(field(row, "address_number")),
        clean_text(field(row, "address_complement")),
        clean_text(field(row, "address_district")),
        clean_text(field(row, "address_city")),
        clean_text(state.as_deref()),
        clean_decimal(field(row, "base_value")),
        clean_decimal(field(row, "total_discount_percentage")),
        clean_decimal(field(row, "total_discount_value")),
        clean_decimal(field(row, "final_monthly_value")),
        clean_decimal(field(row, "material_cost")),
        discounts_json(
            field(row, "discount_code"),
            field(row, "discount_description"),
            field(row, "total_discount_percentage"),
        ),
        format!("'{}'", ACADEMIC_YEAR),
        format!("'{}'", STATUS_APPROVED),
        "NOW()".to_string(),
        "NOW()".to_string(),
    ];

    debug_assert_eq!(values.len(), COLUMNS.len());

    Some(TransformedRecord::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_skips_blank_and_repeated_header() {
        assert!(build_record(&row(&[])).is_none());
        assert!(build_record(&row(&[("student_name", "")])).is_none());
        assert!(build_record(&row(&[("student_name", "student_name")])).is_none());
    }

    #[test]
    fn test_record_width_matches_schema() {
        let record = build_record(&row(&[("student_name", "Ana")])).unwrap();
        assert_eq!(record.values().len(), COLUMNS.len());
    }

    #[test]
    fn test_sparse_row_degrades_to_defaults() {
        let record = build_record(&row(&[("student_name", "Ana")])).unwrap();
        let values = record.values();
        assert_eq!(values[0], "'Ana'");
        // missing cpf / birth date / gender become NULL
        assert_eq!(values[1], "NULL");
        assert_eq!(values[3], "NULL");
        assert_eq!(values[4], "NULL");
        // missing financial fields become 0, discounts the empty array
        assert_eq!(values[28], "0");
        assert_eq!(values[33], "'[]'::jsonb");
    }

    #[test]
    fn test_full_row_transforms_each_field() {
        let record = build_record(&row(&[
            ("student_name", "José D'Ávila"),
            ("student_cpf", "123.456.789-01"),
            ("student_birth_date", "07/04/2011"),
            ("student_gender", "m"),
            ("student_escola", "Escola Nova"),
            ("shift", "MANHÃ"),
            ("address_state", "sp"),
            ("address_cep", "01310-100"),
            ("base_value", "1500,00"),
            ("final_monthly_value", "1350,00"),
            ("total_discount_percentage", "10"),
            ("discount_code", "IIR"),
            ("discount_description", "Irmãos"),
        ]))
        .unwrap();
        let values = record.values();

        assert_eq!(values[0], "'José D''Ávila'");
        assert_eq!(values[1], "'12345678901'");
        assert_eq!(values[3], "'2011-04-07'");
        assert_eq!(values[4], "'M'");
        assert_eq!(values[5], "'escola_nova'");
        assert_eq!(values[10], "'manhã'");
        assert_eq!(values[21], "'01310100'");
        assert_eq!(values[27], "'SP'");
        assert_eq!(values[28], "1500");
        assert_eq!(values[31], "1350");
        assert!(values[33].contains("\"discount_code\":\"IIR\""));
    }

    #[test]
    fn test_fixed_tail_literals() {
        let record = build_record(&row(&[("student_name", "Ana")])).unwrap();
        let values = record.values();
        let n = values.len();
        assert_eq!(values[n - 4], "'2024'");
        assert_eq!(values[n - 3], "'approved'");
        assert_eq!(values[n - 2], "NOW()");
        assert_eq!(values[n - 1], "NOW()");
    }

    #[test]
    fn test_sql_tuple_rendering() {
        let record = TransformedRecord::new(vec!["'a'".into(), "NULL".into(), "0".into()]);
        assert_eq!(record.to_sql_tuple(), "('a', NULL, 0)");
    }

    #[test]
    fn test_state_uppercased_before_sentinel_check() {
        // the source export uppercases the state before the n.a check, so
        // an n.a state survives as a literal rather than NULL
        let record = build_record(&row(&[
            ("student_name", "Ana"),
            ("address_state", "n.a"),
        ]))
        .unwrap();
        assert_eq!(record.values()[27], "'N.A'");
    }
}
