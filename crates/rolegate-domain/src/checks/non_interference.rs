use super::utils::{build_allowlist, is_exempt, violation};
use crate::model::{RoleCatalog, is_read_only_action, patterns_overlap};
use crate::policy::EffectiveConfig;
use rolegate_types::{CompiledPolicy, Effect, PolicyStatement, ValidationResult, ids};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

/// Cross-role non-interference: for every unordered role pair where neither
/// declares the other in `superset_of`, the pair's Allow statements must not
/// overlap on mutating actions over overlapping resources. Shared read-only
/// access (Describe/Get/List/View on both sides) is legitimate and exempt.
///
/// This is the one check with a fan-in requirement: it runs only after every
/// role has finished compiling.
pub fn run(
    catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    cfg: &EffectiveConfig,
    out: &mut Vec<ValidationResult>,
) {
    let Some(policy) = cfg.check_policy(ids::RULE_NON_INTERFERENCE) else {
        return;
    };
    let allow = build_allowlist(&policy.allow);

    let names: Vec<&String> = policies.keys().collect();
    for (i, a_name) in names.iter().enumerate() {
        for b_name in names.iter().skip(i + 1) {
            if is_exempt(allow.as_ref(), a_name) || is_exempt(allow.as_ref(), b_name) {
                continue;
            }
            let declared_superset = match (catalog.get(a_name), catalog.get(b_name)) {
                (Some(a), Some(b)) => a.is_superset_of(b_name) || b.is_superset_of(a_name),
                _ => false,
            };
            if declared_superset {
                continue;
            }

            let overlap = mutating_overlap(&policies[*a_name], &policies[*b_name]);
            if !overlap.is_empty() {
                let sample: Vec<&String> = overlap.iter().take(3).collect();
                out.push(violation(
                    policy,
                    ids::RULE_NON_INTERFERENCE,
                    ids::CODE_OVERLAPPING_GRANT,
                    format!(
                        "roles '{}' and '{}' both allow mutating actions over overlapping \
                         resources (e.g. {})",
                        a_name,
                        b_name,
                        sample
                            .iter()
                            .map(|s| s.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    Some(a_name),
                    None,
                    json!({ "other_role": b_name, "overlapping_actions": overlap }),
                ));
            }
        }
    }
}

/// Mutating action patterns the two policies can both match, restricted to
/// statement pairs whose resource patterns can also meet.
fn mutating_overlap(a: &CompiledPolicy, b: &CompiledPolicy) -> BTreeSet<String> {
    let mut overlap = BTreeSet::new();
    for sa in allow_statements(a) {
        for sb in allow_statements(b) {
            if !resources_overlap(sa, sb) {
                continue;
            }
            for pa in &sa.actions {
                for pb in &sb.actions {
                    if !patterns_overlap(pa, pb) {
                        continue;
                    }
                    if is_read_only_action(pa) && is_read_only_action(pb) {
                        continue;
                    }
                    // Report the narrower side of the overlap.
                    let narrower = if pa.len() >= pb.len() { pa } else { pb };
                    overlap.insert(narrower.clone());
                }
            }
        }
    }
    overlap
}

fn allow_statements(policy: &CompiledPolicy) -> impl Iterator<Item = &PolicyStatement> {
    policy
        .statements
        .iter()
        .filter(|s| s.effect == Effect::Allow && !s.actions.is_empty())
}

fn resources_overlap(a: &PolicyStatement, b: &PolicyStatement) -> bool {
    a.resources
        .iter()
        .any(|ra| b.resources.iter().any(|rb| patterns_overlap(ra, rb)))
}
