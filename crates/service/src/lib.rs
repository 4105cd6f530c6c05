//! Service layer for the SWIFT code registry.
//! - `swift_code`: record store abstraction and the record manager that shapes responses.
//! - `importer`: one-shot spreadsheet loader that feeds the record manager.
//! - Errors are typed per layer and converted to transport statuses only in `server`.

pub mod errors;
pub mod swift_code;
pub mod importer;
#[cfg(test)]
pub mod test_support;
