use super::utils::{build_allowlist, is_exempt, violation};
use crate::compile::mfa_deny_statement;
use crate::model::RoleCatalog;
use crate::policy::EffectiveConfig;
use rolegate_types::{CompiledPolicy, ValidationResult, ids};
use serde_json::json;
use std::collections::BTreeMap;

/// MFA gating: every role with `requires_mfa` must carry exactly one
/// synthesized MFA deny statement, byte-for-byte in the canonical shape.
pub fn run(
    catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    cfg: &EffectiveConfig,
    out: &mut Vec<ValidationResult>,
) {
    let Some(policy) = cfg.check_policy(ids::RULE_MFA_GATING) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);
    let canonical = mfa_deny_statement();

    for (role_name, role) in &catalog.roles {
        if !role.requires_mfa || is_exempt(allow.as_ref(), role_name) {
            continue;
        }
        let Some(compiled) = policies.get(role_name) else {
            // Roles that failed to compile are reported by the compile stage.
            continue;
        };

        // Statements with any not_actions are MFA-deny candidates: the
        // compiler emits not_actions nowhere else.
        let candidates: Vec<(usize, bool)> = compiled
            .statements
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.not_actions.is_empty())
            .map(|(idx, s)| (idx, *s == canonical))
            .collect();

        match candidates.as_slice() {
            [] => out.push(violation(
                policy,
                ids::RULE_MFA_GATING,
                ids::CODE_MISSING_MFA_DENY,
                format!("role '{}' requires MFA but has no MFA deny statement", role_name),
                Some(role_name),
                None,
                json!({ "requires_mfa": true }),
            )),
            [(idx, well_formed)] => {
                if !well_formed {
                    out.push(violation(
                        policy,
                        ids::RULE_MFA_GATING,
                        ids::CODE_MALFORMED_MFA_DENY,
                        format!(
                            "role '{}' statement {} deviates from the canonical MFA deny shape",
                            role_name, idx
                        ),
                        Some(role_name),
                        Some(*idx as u32),
                        json!({ "expected_not_actions": canonical.not_actions }),
                    ));
                }
            }
            many => out.push(violation(
                policy,
                ids::RULE_MFA_GATING,
                ids::CODE_DUPLICATE_MFA_DENY,
                format!(
                    "role '{}' carries {} MFA deny candidates; exactly one is required",
                    role_name,
                    many.len()
                ),
                Some(role_name),
                None,
                json!({ "count": many.len() }),
            )),
        }
    }
}
