use crate::checks;
use crate::compile::CompileError;
use crate::model::RoleCatalog;
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::DomainReport;
use rolegate_types::{
    CompiledPolicy, ComplianceStatus, RoleCompileErrorRecord, RolegateData, Severity,
    SeverityCounts, ValidationResult, ids,
};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Run the full invariant battery over a compiled policy set.
///
/// Per-role compile errors are folded in as critical results so the report
/// stays complete even when some roles produced no policy. Validation
/// findings are data, never errors: the pipeline always completes.
pub fn validate(
    catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    compile_errors: &[CompileError],
    cfg: &EffectiveConfig,
) -> DomainReport {
    let mut results: Vec<ValidationResult> = Vec::new();

    for err in compile_errors {
        results.push(compile_error_result(err));
    }

    for (rule_id, check) in checks::battery() {
        let Some(policy) = cfg.check_policy(rule_id) else {
            continue;
        };
        let before = results.len();
        check(catalog, policies, cfg, &mut results);
        if results.len() == before {
            results.push(ValidationResult {
                severity: policy.severity,
                rule_id: rule_id.to_string(),
                code: ids::CODE_CHECK_PASSED.to_string(),
                passed: true,
                message: format!("{rule_id} passed for {} roles", policies.len()),
                role: None,
                statement: None,
                fingerprint: None,
                data: JsonValue::Null,
            });
        }
    }

    // Deterministic ordering before truncation.
    results.sort_by(compare_results);

    let total = results.len() as u32;
    let mut emitted = results;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_results {
        emitted.truncate(cfg.max_results);
        truncated_reason = Some(format!(
            "results truncated to max_results={}",
            cfg.max_results
        ));
    }

    let status = compute_status(&emitted, cfg.fail_on);
    let counts = SeverityCounts::from_results(&emitted);

    let data = RolegateData {
        profile: cfg.profile.clone(),
        roles_total: catalog.roles.len() as u32,
        roles_compiled: policies.len() as u32,
        statements_total: policies.values().map(|p| p.statements.len() as u32).sum(),
        results_total: total,
        results_emitted: emitted.len() as u32,
        compile_errors: compile_errors
            .iter()
            .map(|e| RoleCompileErrorRecord {
                role: e.role().to_string(),
                code: compile_error_code(e).to_string(),
                message: e.to_string(),
            })
            .collect(),
        truncated_reason,
    };

    DomainReport {
        status,
        results: emitted,
        data,
        counts,
    }
}

fn compile_error_result(err: &CompileError) -> ValidationResult {
    let code = compile_error_code(err);
    ValidationResult {
        severity: Severity::Critical,
        rule_id: ids::RULE_COMPILE.to_string(),
        code: code.to_string(),
        passed: false,
        message: err.to_string(),
        role: Some(err.role().to_string()),
        statement: None,
        fingerprint: Some(crate::fingerprint::fingerprint_for_violation(
            ids::RULE_COMPILE,
            code,
            err.role(),
            None,
        )),
        data: JsonValue::Null,
    }
}

fn compile_error_code(err: &CompileError) -> &'static str {
    match err {
        CompileError::OverlyBroadGrant { .. } => ids::CODE_OVERLY_BROAD_GRANT,
        CompileError::StatementLimitExceeded { .. } => ids::CODE_STATEMENT_LIMIT_EXCEEDED,
    }
}

fn compute_status(results: &[ValidationResult], fail_on: FailOn) -> ComplianceStatus {
    let threshold = match fail_on {
        FailOn::Critical => Severity::Critical,
        FailOn::High => Severity::High,
    };
    let failing = results
        .iter()
        .any(|r| !r.passed && r.severity >= threshold);
    if failing {
        ComplianceStatus::NonCompliant
    } else {
        ComplianceStatus::Compliant
    }
}

fn compare_results(a: &ValidationResult, b: &ValidationResult) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) failed before passed
    // 2) severity (critical -> low)
    // 3) rule_id
    // 4) role (missing last)
    // 5) statement index (missing last)
    // 6) code
    // 7) message
    let role_key = |r: &ValidationResult| r.role.clone().unwrap_or_else(|| "~".to_string());
    let stmt_key = |r: &ValidationResult| r.statement.unwrap_or(u32::MAX);

    a.passed
        .cmp(&b.passed)
        .then(b.severity.cmp(&a.severity))
        .then(a.rule_id.cmp(&b.rule_id))
        .then(role_key(a).cmp(&role_key(b)))
        .then(stmt_key(a).cmp(&stmt_key(b)))
        .then(a.code.cmp(&b.code))
        .then(a.message.cmp(&b.message))
}

#[cfg(test)]
pub(crate) fn compare_results_for_tests(
    a: &ValidationResult,
    b: &ValidationResult,
) -> std::cmp::Ordering {
    compare_results(a, b)
}
