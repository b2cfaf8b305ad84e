//! Domain models and destination schema contract.
//!
//! This module pins down everything the target table dictates:
//!
//! - [`TABLE`] / [`COLUMNS`] - destination table and its column order
//! - [`AppliedDiscount`] - the JSON payload stored in `applied_discounts`
//! - Fixed literals stamped on every imported row (academic year, status)

use serde::{Deserialize, Serialize};

// =============================================================================
// Destination Table
// =============================================================================

/// Target table for the generated INSERT statements.
pub const TABLE: &str = "public.previous_year_students";

/// Destination columns, in the exact order values are emitted.
///
/// Every VALUES tuple produced by the row pipeline has one literal per
/// entry here, in this order.
pub const COLUMNS: [&str; 38] = [
    "student_name",
    "student_cpf",
    "student_rg",
    "student_birth_date",
    "student_gender",
    "student_escola",
    "series_id",
    "series_name",
    "track_id",
    "track_name",
    "shift",
    "guardian1_name",
    "guardian1_cpf",
    "guardian1_phone",
    "guardian1_email",
    "guardian1_relationship",
    "guardian2_name",
    "guardian2_cpf",
    "guardian2_phone",
    "guardian2_email",
    "guardian2_relationship",
    "address_cep",
    "address_street",
    "address_number",
    "address_complement",
    "address_district",
    "address_city",
    "address_state",
    "base_value",
    "total_discount_percentage",
    "total_discount_value",
    "final_monthly_value",
    "material_cost",
    "applied_discounts",
    "academic_year",
    "status",
    "created_at",
    "updated_at",
];

// =============================================================================
// Fixed Import Literals
// =============================================================================

/// Enrollment cycle every migrated record is tagged with.
pub const ACADEMIC_YEAR: &str = "2024";

/// Status stamped on every migrated record.
pub const STATUS_APPROVED: &str = "approved";

/// Default number of records per INSERT statement.
pub const DEFAULT_BATCH_SIZE: usize = 100;

// =============================================================================
// Applied Discount
// =============================================================================

/// A discount applied to an enrollment, stored as JSON in the
/// `applied_discounts` column.
///
/// A migrated row carries at most one of these; rows without a discount get
/// an empty JSON array. Field order matters: it is the serialized key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedDiscount {
    /// Discount code from the source export (e.g. "IIR").
    pub discount_code: String,
    /// Human-readable discount name.
    pub discount_name: String,
    /// Percentage off the base value (0-100).
    pub percentage: f64,
    /// Whether supporting documents are required. Always `true` for
    /// migrated discounts; the review flow re-checks them.
    pub requires_documents: bool,
}

impl AppliedDiscount {
    /// Create a discount with the fixed `requires_documents` policy.
    pub fn new(code: impl Into<String>, name: impl Into<String>, percentage: f64) -> Self {
        Self {
            discount_code: code.into(),
            discount_name: name.into(),
            percentage,
            requires_documents: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_and_uniqueness() {
        assert_eq!(COLUMNS.len(), 38);
        let mut seen = std::collections::HashSet::new();
        for col in COLUMNS {
            assert!(seen.insert(col), "duplicate column: {}", col);
        }
    }

    #[test]
    fn test_discount_serialization_key_order() {
        let discount = AppliedDiscount::new("D10", "Desconto D10", 10.0);
        let json = serde_json::to_string(&vec![discount]).unwrap();
        assert_eq!(
            json,
            r#"[{"discount_code":"D10","discount_name":"Desconto D10","percentage":10.0,"requires_documents":true}]"#
        );
    }

    #[test]
    fn test_discount_keeps_non_ascii() {
        let discount = AppliedDiscount::new("IIR", "Irmãos na instituição", 15.0);
        let json = serde_json::to_string(&discount).unwrap();
        assert!(json.contains("Irmãos na instituição"));
        assert!(!json.contains("\\u"));
    }
}
