use super::utils::violation;
use crate::model::RoleCatalog;
use crate::policy::EffectiveConfig;
use rolegate_types::{CompiledPolicy, ValidationResult, ids};
use serde_json::json;
use std::collections::BTreeMap;

/// The strongest built-in rule: no statement may pair `actions == {"*"}`
/// with `resources == {"*"}`. The compiler refuses to construct one, but the
/// validator accepts policies from any source, so it re-checks. No role
/// allowlist here; this rule is not exemptable.
pub fn run(
    _catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    cfg: &EffectiveConfig,
    out: &mut Vec<ValidationResult>,
) {
    let Some(policy) = cfg.check_policy(ids::RULE_NO_WILDCARD_GRANT) else {
        return;
    };

    for (role_name, compiled) in policies {
        for (idx, statement) in compiled.statements.iter().enumerate() {
            let wildcard_actions =
                statement.actions.len() == 1 && statement.actions.contains("*");
            let wildcard_resources =
                statement.resources.len() == 1 && statement.resources.contains("*");
            if wildcard_actions && wildcard_resources {
                out.push(violation(
                    policy,
                    ids::RULE_NO_WILDCARD_GRANT,
                    ids::CODE_WILDCARD_ACTION_AND_RESOURCE,
                    format!(
                        "role '{}' statement {} grants every action on every resource",
                        role_name, idx
                    ),
                    Some(role_name),
                    Some(idx as u32),
                    json!({ "effect": statement.effect }),
                ));
            }
        }
    }
}
