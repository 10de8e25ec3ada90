use crate::policy::CompiledPolicy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifiers.
pub const SCHEMA_REPORT_V1: &str = "rolegate.report.v1";
pub const SCHEMA_CATALOG_V1: &str = "rolegate.catalog.v1";

/// Severity of a validation result. Only `Critical` flips the overall
/// compliance status; everything below is reported but non-fatal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
}

/// One outcome of one invariant check.
///
/// Created fresh on every validator run, never mutated, consumed immediately
/// by the reporting collaborator. The system holds no history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub severity: Severity,
    pub rule_id: String,
    pub code: String,
    pub passed: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Index of the offending statement within the role's compiled policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<u32>,

    /// Stable identifier intended for dedup and trending. A hash of:
    /// `rule_id + code + role + (statement?) + salient fields`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Check-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl SeverityCounts {
    /// Count failed results only; passing summaries do not count as findings.
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut counts = SeverityCounts::default();
        for r in results.iter().filter(|r| !r.passed) {
            match r.severity {
                Severity::Low => counts.low += 1,
                Severity::Medium => counts.medium += 1,
                Severity::High => counts.high += 1,
                Severity::Critical => counts.critical += 1,
            }
        }
        counts
    }
}

/// A per-role policy-construction failure, surfaced alongside the partial
/// policy map instead of aborting sibling roles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RoleCompileErrorRecord {
    pub role: String,
    pub code: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Rolegate-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct RolegateData {
    pub profile: String,

    pub roles_total: u32,
    pub roles_compiled: u32,
    pub statements_total: u32,

    pub results_total: u32,
    pub results_emitted: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compile_errors: Vec<RoleCompileErrorRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

/// The report envelope handed to external renderers.
///
/// Keeping `data` generic allows tool-specific payloads while enforcing a
/// stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = RolegateData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub status: ComplianceStatus,
    pub results: Vec<ValidationResult>,
    /// Compiled policies for roles that compiled successfully.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub policies: BTreeMap<String, CompiledPolicy>,
    pub data: TData,
}

pub type RolegateReport = ReportEnvelope<RolegateData>;

/// Standalone compiled-catalogue document, for `compile` runs that stop
/// before validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEnvelope {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub policies: BTreeMap<String, CompiledPolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compile_errors: Vec<RoleCompileErrorRecord>,
}
