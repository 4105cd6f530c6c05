//! SWIFT code records: domain types, store abstraction, record manager.
//!
//! Same three-layer split as the rest of the service crate
//! (domain, repository, service), with the SeaORM store under `repo`.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::SwiftCodeService;
