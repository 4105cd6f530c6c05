//! Spreadsheet row → create input, including the headquarters convention.

use crate::swift_code::domain::CreateSwiftCodeInput;

/// Columns: ISO2, code, type, name, address, town, country name, time zone.
pub const MIN_COLUMNS: usize = 8;
pub const HEADQUARTER_SUFFIX: &str = "XXX";
const HEADQUARTER_PREFIX_LEN: usize = 8;

pub fn is_headquarter_code(code: &str) -> bool {
    code.to_uppercase().ends_with(HEADQUARTER_SUFFIX)
}

/// `first 8 chars + "XXX"` for branch codes; `None` for headquarters and short codes.
pub fn derive_headquarter_code(code: &str) -> Option<String> {
    if is_headquarter_code(code) {
        return None;
    }
    let prefix: String = code.chars().take(HEADQUARTER_PREFIX_LEN).collect();
    (prefix.chars().count() == HEADQUARTER_PREFIX_LEN).then(|| format!("{prefix}{HEADQUARTER_SUFFIX}"))
}

/// Build a create input from one data row; `None` when the row is too short.
pub fn parse_row(cells: &[String]) -> Option<CreateSwiftCodeInput> {
    if cells.len() < MIN_COLUMNS {
        return None;
    }
    let cell = |i: usize| cells[i].trim();

    let swift_code = cell(1).to_string();
    Some(CreateSwiftCodeInput {
        is_headquarter: is_headquarter_code(&swift_code),
        headquarter_swift_code: derive_headquarter_code(&swift_code),
        bank_name: cell(3).to_string(),
        address: format!("{}, {}", cell(4), cell(5)),
        country_iso2: cell(0).to_uppercase(),
        country_name: cell(6).to_uppercase(),
        swift_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn xxx_suffix_is_headquarters() {
        assert!(is_headquarter_code("ABCDEFGHXXX"));
        assert!(is_headquarter_code("abcdefghxxx"));
        assert!(!is_headquarter_code("ABCDEFGHBR1"));
        assert_eq!(derive_headquarter_code("ABCDEFGHXXX"), None);
    }

    #[test]
    fn branch_reference_uses_first_eight_chars() {
        assert_eq!(derive_headquarter_code("ABCDEFGHBR1").as_deref(), Some("ABCDEFGHXXX"));
        assert_eq!(derive_headquarter_code("ABCDEFGH").as_deref(), Some("ABCDEFGHXXX"));
        assert_eq!(derive_headquarter_code("ABCDEFG"), None);
    }

    #[test]
    fn headquarters_row_has_no_reference() {
        let input = parse_row(&cells(&[
            "pl", "ABCDEFGHXXX", "BIC11", "Bank HQ", "Prosta 1", "Warszawa", "Poland", "Europe/Warsaw",
        ]))
        .unwrap();
        assert!(input.is_headquarter);
        assert_eq!(input.headquarter_swift_code, None);
        assert_eq!(input.country_iso2, "PL");
        assert_eq!(input.country_name, "POLAND");
        assert_eq!(input.address, "Prosta 1, Warszawa");
    }

    #[test]
    fn branch_row_references_headquarters() {
        let input = parse_row(&cells(&[
            "PL", " ABCDEFGHBR1 ", "BIC11", "Bank Branch", "Dluga 2", "Krakow", "POLAND", "Europe/Warsaw",
        ]))
        .unwrap();
        assert_eq!(input.swift_code, "ABCDEFGHBR1");
        assert!(!input.is_headquarter);
        assert_eq!(input.headquarter_swift_code.as_deref(), Some("ABCDEFGHXXX"));
    }

    #[test]
    fn short_row_is_skipped() {
        assert!(parse_row(&cells(&["PL", "ABCDEFGHXXX", "BIC11", "Bank"])).is_none());
    }
}
