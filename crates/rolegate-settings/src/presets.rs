use rolegate_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use rolegate_types::{Severity, ids};
use std::collections::BTreeMap;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "audit" => audit_profile(),
        // default
        _ => strict_profile(),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Critical,
        max_results: 200,
        checks: default_checks(),
    }
}

/// Audit mode reports everything but only critical findings gate; severities
/// stay at their documented defaults so the report reads the same.
fn audit_profile() -> EffectiveConfig {
    let mut cfg = strict_profile();
    cfg.profile = "audit".to_string();
    cfg.max_results = 1000;
    cfg
}

fn default_checks() -> BTreeMap<String, CheckPolicy> {
    let mut m = BTreeMap::new();

    m.insert(
        ids::RULE_STRUCTURAL_LIMITS.to_string(),
        CheckPolicy::enabled(Severity::High),
    );
    m.insert(
        ids::RULE_EXPLICIT_FIELDS.to_string(),
        CheckPolicy::enabled(Severity::High),
    );
    m.insert(
        ids::RULE_RESOURCE_SCOPING.to_string(),
        CheckPolicy::enabled(Severity::High),
    );
    m.insert(
        ids::RULE_NO_WILDCARD_GRANT.to_string(),
        CheckPolicy::enabled(Severity::Critical),
    );
    m.insert(
        ids::RULE_NON_INTERFERENCE.to_string(),
        CheckPolicy::enabled(Severity::Critical),
    );
    m.insert(
        ids::RULE_MFA_GATING.to_string(),
        CheckPolicy::enabled(Severity::Critical),
    );
    m.insert(
        ids::RULE_DENY_CONDITIONS.to_string(),
        CheckPolicy::enabled(Severity::Medium),
    );

    m
}
