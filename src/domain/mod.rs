//! Domain layer for Quasar Preflight
//!
//! CDD Principle: Domain Model - Pure logic for legacy-pattern findings
//! - Contains the violation entities and the validation report aggregate
//! - Independent of file systems, terminals and process exit codes

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
