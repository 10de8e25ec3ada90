use super::utils::{build_allowlist, is_exempt, violation};
use crate::model::RoleCatalog;
use crate::policy::EffectiveConfig;
use rolegate_types::{CompiledPolicy, ValidationResult, ids};
use serde_json::json;
use std::collections::BTreeMap;

pub fn run(
    _catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    cfg: &EffectiveConfig,
    out: &mut Vec<ValidationResult>,
) {
    let Some(policy) = cfg.check_policy(ids::RULE_EXPLICIT_FIELDS) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for (role_name, compiled) in policies {
        if is_exempt(allow.as_ref(), role_name) {
            continue;
        }
        for (idx, statement) in compiled.statements.iter().enumerate() {
            if statement.is_empty() {
                out.push(violation(
                    policy,
                    ids::RULE_EXPLICIT_FIELDS,
                    ids::CODE_EMPTY_STATEMENT,
                    format!(
                        "role '{}' statement {} names neither actions nor not_actions",
                        role_name, idx
                    ),
                    Some(role_name),
                    Some(idx as u32),
                    json!({ "effect": statement.effect }),
                ));
            } else if !statement.actions.is_empty() && !statement.not_actions.is_empty() {
                out.push(violation(
                    policy,
                    ids::RULE_EXPLICIT_FIELDS,
                    ids::CODE_ACTIONS_AND_NOT_ACTIONS,
                    format!(
                        "role '{}' statement {} carries both actions and not_actions",
                        role_name, idx
                    ),
                    Some(role_name),
                    Some(idx as u32),
                    json!({
                        "actions": statement.actions,
                        "not_actions": statement.not_actions,
                    }),
                ));
            }
        }
    }
}
