use super::utils::{build_allowlist, is_exempt, violation};
use crate::model::{RoleCatalog, is_read_only_action, matches_prefix};
use crate::policy::EffectiveConfig;
use rolegate_types::{CompiledPolicy, Effect, ValidationResult, ids};
use serde_json::json;
use std::collections::BTreeMap;

/// Resource scoping: a role with a declared prefix convention must keep its
/// Allow statements inside that prefix, and may use `*` only when every
/// action in the statement is read-only. Roles without a declared prefix
/// have no convention to enforce and are skipped.
pub fn run(
    catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    cfg: &EffectiveConfig,
    out: &mut Vec<ValidationResult>,
) {
    let Some(policy) = cfg.check_policy(ids::RULE_RESOURCE_SCOPING) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    for (role_name, compiled) in policies {
        if is_exempt(allow.as_ref(), role_name) {
            continue;
        }
        let Some(prefix) = catalog.get(role_name).and_then(|r| r.resource_prefix.clone()) else {
            continue;
        };

        for (idx, statement) in compiled.statements.iter().enumerate() {
            if statement.effect != Effect::Allow {
                continue;
            }
            for resource in &statement.resources {
                if resource == "*" {
                    let all_read_only = statement.actions.iter().all(|a| is_read_only_action(a));
                    if !all_read_only {
                        out.push(violation(
                            policy,
                            ids::RULE_RESOURCE_SCOPING,
                            ids::CODE_WILDCARD_RESOURCE_MUTATION,
                            format!(
                                "role '{}' statement {} grants non-read-only actions on '*'",
                                role_name, idx
                            ),
                            Some(role_name),
                            Some(idx as u32),
                            json!({ "actions": statement.actions }),
                        ));
                    }
                } else if !matches_prefix(resource, &prefix) {
                    out.push(violation(
                        policy,
                        ids::RULE_RESOURCE_SCOPING,
                        ids::CODE_UNSCOPED_RESOURCE,
                        format!(
                            "role '{}' statement {} targets '{}' outside its declared prefix '{}'",
                            role_name, idx, resource, prefix
                        ),
                        Some(role_name),
                        Some(idx as u32),
                        json!({ "resource": resource, "prefix": prefix }),
                    ));
                }
            }
        }
    }
}
