use crate::fingerprint::fingerprint_for_violation;
use crate::policy::CheckPolicy;
use globset::{Glob, GlobSet, GlobSetBuilder};
use rolegate_types::ValidationResult;
use serde_json::Value as JsonValue;

pub fn build_allowlist(allow: &[String]) -> Option<GlobSet> {
    if allow.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in allow {
        // Treat allowlist entries as glob patterns over role names.
        let glob =
            Glob::new(pattern).expect("allowlist patterns must be validated in rolegate-settings");
        builder.add(glob);
    }
    Some(
        builder
            .build()
            .expect("allowlist patterns must be validated in rolegate-settings"),
    )
}

pub fn is_exempt(allow: Option<&GlobSet>, role: &str) -> bool {
    allow.map(|set| set.is_match(role)).unwrap_or(false)
}

/// Build a failed result with a stable fingerprint.
pub fn violation(
    policy: &CheckPolicy,
    rule_id: &str,
    code: &str,
    message: String,
    role: Option<&str>,
    statement: Option<u32>,
    data: JsonValue,
) -> ValidationResult {
    let fingerprint = role.map(|r| fingerprint_for_violation(rule_id, code, r, statement));
    ValidationResult {
        severity: policy.severity,
        rule_id: rule_id.to_string(),
        code: code.to_string(),
        passed: false,
        message,
        role: role.map(|r| r.to_string()),
        statement,
        fingerprint,
        data,
    }
}
