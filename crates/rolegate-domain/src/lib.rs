//! Pure policy compilation and validation (no IO).
//!
//! Input: a role catalogue constructed elsewhere.
//! Output: compiled policies, validation results, and a compliance status.

#![forbid(unsafe_code)]

pub mod compile;
pub mod model;
pub mod policy;
pub mod report;

pub mod checks;
mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use compile::{compile_catalog, compile_role, CompileError, CompileOutcome};
pub use engine::validate;
pub use fingerprint::fingerprint_for_violation;
