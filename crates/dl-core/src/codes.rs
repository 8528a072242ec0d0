//! Business record code prefixes and formatting.
//!
//! Codes look like `CUST-0001`: a table-specific prefix and a zero-padded
//! sequence number derived from the table's row count.

pub const PREFIX_CUSTOMER: &str = "CUST";
pub const PREFIX_EMPLOYEE: &str = "EMP";
pub const PREFIX_INVOICE: &str = "INV";
pub const PREFIX_EXPENSE: &str = "EXP";
pub const PREFIX_LEAD: &str = "LEAD";

/// All prefixes, for validation and tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_CUSTOMER,
    PREFIX_EMPLOYEE,
    PREFIX_INVOICE,
    PREFIX_EXPENSE,
    PREFIX_LEAD,
];

/// Format a record code, e.g. `format_code("CUST", 7) == "CUST-0007"`.
#[must_use]
pub fn format_code(prefix: &str, sequence: u64) -> String {
    format!("{prefix}-{sequence:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_four_digits() {
        assert_eq!(format_code(PREFIX_CUSTOMER, 1), "CUST-0001");
        assert_eq!(format_code(PREFIX_INVOICE, 42), "INV-0042");
    }

    #[test]
    fn wide_sequences_are_not_truncated() {
        assert_eq!(format_code(PREFIX_EXPENSE, 12345), "EXP-12345");
    }
}
