use super::utils::{build_allowlist, is_exempt, violation};
use crate::model::RoleCatalog;
use crate::policy::EffectiveConfig;
use rolegate_types::consts::ALLOWED_CONDITION_OPERATORS;
use rolegate_types::{CompiledPolicy, Effect, ValidationResult, ids};
use serde_json::json;
use std::collections::BTreeMap;

/// Deny condition consistency: an unrecognized operator on a Deny statement
/// is worse than none, because most evaluators skip operators they do not
/// know and the guard silently stops firing.
pub fn run(
    _catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    cfg: &EffectiveConfig,
    out: &mut Vec<ValidationResult>,
) {
    let Some(policy) = cfg.check_policy(ids::RULE_DENY_CONDITIONS) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for (role_name, compiled) in policies {
        if is_exempt(allow.as_ref(), role_name) {
            continue;
        }
        for (idx, statement) in compiled.statements.iter().enumerate() {
            if statement.effect != Effect::Deny {
                continue;
            }
            for operator in statement.conditions.keys() {
                if !ALLOWED_CONDITION_OPERATORS.contains(&operator.as_str()) {
                    out.push(violation(
                        policy,
                        ids::RULE_DENY_CONDITIONS,
                        ids::CODE_UNKNOWN_CONDITION_OPERATOR,
                        format!(
                            "role '{}' statement {} uses unrecognized condition operator '{}'",
                            role_name, idx, operator
                        ),
                        Some(role_name),
                        Some(idx as u32),
                        json!({ "operator": operator }),
                    ));
                }
            }
        }
    }
}
