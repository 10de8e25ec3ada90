use super::utils::{build_allowlist, is_exempt, violation};
use crate::model::{RoleCatalog, StatementLimits};
use crate::policy::EffectiveConfig;
use rolegate_types::consts::MAX_POLICY_DOCUMENT_BYTES;
use rolegate_types::{CompiledPolicy, ValidationResult, ids};
use serde_json::json;
use std::collections::BTreeMap;

pub fn run(
    catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    cfg: &EffectiveConfig,
    out: &mut Vec<ValidationResult>,
) {
    let Some(policy) = cfg.check_policy(ids::RULE_STRUCTURAL_LIMITS) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for (role_name, compiled) in policies {
        if is_exempt(allow.as_ref(), role_name) {
            continue;
        }
        // Validation must hold even for policies that did not come through
        // this compiler, so role limits fall back to the defaults.
        let limits = catalog
            .get(role_name)
            .map(|r| r.limits)
            .unwrap_or_else(StatementLimits::default);

        // The synthesized MFA gate (the only not_actions statement) has a
        // fixed shape and does not count against the merge-output ceiling.
        let counted = compiled
            .statements
            .iter()
            .filter(|s| s.not_actions.is_empty())
            .count();
        if counted > limits.max_statements {
            out.push(violation(
                policy,
                ids::RULE_STRUCTURAL_LIMITS,
                ids::CODE_TOO_MANY_STATEMENTS,
                format!(
                    "role '{}' compiled to {} statements (ceiling {})",
                    role_name, counted, limits.max_statements
                ),
                Some(role_name),
                None,
                json!({ "count": counted, "max": limits.max_statements }),
            ));
        }

        for (idx, statement) in compiled.statements.iter().enumerate() {
            let action_count = statement.actions.len().max(statement.not_actions.len());
            if action_count > limits.max_actions_per_statement {
                out.push(violation(
                    policy,
                    ids::RULE_STRUCTURAL_LIMITS,
                    ids::CODE_TOO_MANY_ACTIONS,
                    format!(
                        "role '{}' statement {} lists {} actions (ceiling {})",
                        role_name, idx, action_count, limits.max_actions_per_statement
                    ),
                    Some(role_name),
                    Some(idx as u32),
                    json!({ "count": action_count, "max": limits.max_actions_per_statement }),
                ));
            }
            if statement.resources.len() > limits.max_resources_per_statement {
                out.push(violation(
                    policy,
                    ids::RULE_STRUCTURAL_LIMITS,
                    ids::CODE_TOO_MANY_RESOURCES,
                    format!(
                        "role '{}' statement {} lists {} resources (ceiling {})",
                        role_name,
                        idx,
                        statement.resources.len(),
                        limits.max_resources_per_statement
                    ),
                    Some(role_name),
                    Some(idx as u32),
                    json!({
                        "count": statement.resources.len(),
                        "max": limits.max_resources_per_statement,
                    }),
                ));
            }
        }

        let serialized = compiled.serialized_len();
        if serialized > MAX_POLICY_DOCUMENT_BYTES {
            out.push(violation(
                policy,
                ids::RULE_STRUCTURAL_LIMITS,
                ids::CODE_DOCUMENT_TOO_LARGE,
                format!(
                    "role '{}' policy serializes to {} bytes (ceiling {})",
                    role_name, serialized, MAX_POLICY_DOCUMENT_BYTES
                ),
                Some(role_name),
                None,
                json!({ "bytes": serialized, "max": MAX_POLICY_DOCUMENT_BYTES }),
            ));
        }
    }
}
