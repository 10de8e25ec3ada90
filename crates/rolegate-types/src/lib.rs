//! Stable DTOs and IDs used across the rolegate workspace.
//!
//! This crate is intentionally boring:
//! - data types for compiled policies and the emitted report
//! - stable string IDs and codes
//! - process-wide policy constants (MFA action list, condition operators)
//! - explain registry for remediation guidance
//!
//! Everything here serializes to a JSON-compatible interchange shape with no
//! cloud-provider-specific field names; provider-specific rendering is the
//! consumer's job.

#![forbid(unsafe_code)]

pub mod consts;
pub mod explain;
pub mod ids;
pub mod policy;
pub mod report;

pub use explain::{Explanation, lookup_explanation};
pub use policy::{CompiledPolicy, ConditionMap, ConditionValue, Effect, PolicyStatement};
pub use report::{
    CatalogEnvelope, ComplianceStatus, ReportEnvelope, RolegateData, RolegateReport,
    RoleCompileErrorRecord, SeverityCounts, Severity, ToolMeta, ValidationResult,
    SCHEMA_CATALOG_V1, SCHEMA_REPORT_V1,
};
