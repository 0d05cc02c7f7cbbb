//! Domain Layer - Token records and the rules that apply to them
//!
//! Pure types and logic with no I/O:
//! - `record`: the token observation and its identity key
//! - `dedup`: first-occurrence deduplication of a scraped batch
//! - `address`: pluggable mint-address syntax checks

pub mod record;
pub mod dedup;
pub mod address;

pub use record::TokenRecord;
pub use dedup::dedup_records;
pub use address::{AddressValidation, AddressValidator, Base58Validator, CharsetValidator};
