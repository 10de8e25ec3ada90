//! Shared constructors for domain tests.

use crate::model::{Capability, Role, RoleCatalog, StatementLimits};
use crate::policy::{CheckPolicy, EffectiveConfig, FailOn};
use rolegate_types::{ConditionMap, Effect, Severity, ids};
use std::collections::{BTreeMap, BTreeSet};

pub fn allow(actions: &[&str], resources: &[&str]) -> Capability {
    capability(Effect::Allow, actions, resources)
}

pub fn deny(actions: &[&str], resources: &[&str]) -> Capability {
    capability(Effect::Deny, actions, resources)
}

pub fn capability(effect: Effect, actions: &[&str], resources: &[&str]) -> Capability {
    Capability {
        effect,
        actions: actions.iter().map(|s| s.to_string()).collect(),
        resources: resources.iter().map(|s| s.to_string()).collect(),
        conditions: ConditionMap::new(),
    }
}

pub fn simple_role(name: &str, requires_mfa: bool) -> Role {
    role_with(name, requires_mfa, Vec::new())
}

pub fn role_with(name: &str, requires_mfa: bool, capabilities: Vec<Capability>) -> Role {
    Role {
        name: name.to_string(),
        requires_mfa,
        capabilities,
        resource_prefix: None,
        superset_of: BTreeSet::new(),
        limits: StatementLimits::default(),
    }
}

pub fn scoped_role(
    name: &str,
    requires_mfa: bool,
    resource_prefix: &str,
    capabilities: Vec<Capability>,
) -> Role {
    let mut role = role_with(name, requires_mfa, capabilities);
    role.resource_prefix = Some(resource_prefix.to_string());
    role
}

pub fn catalog_of(roles: Vec<Role>) -> RoleCatalog {
    let mut catalog = RoleCatalog::default();
    for role in roles {
        catalog.roles.insert(role.name.clone(), role);
    }
    catalog
}

/// Config with every check enabled at its default severity.
pub fn default_config() -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(
        ids::RULE_STRUCTURAL_LIMITS.to_string(),
        CheckPolicy::enabled(Severity::High),
    );
    checks.insert(
        ids::RULE_EXPLICIT_FIELDS.to_string(),
        CheckPolicy::enabled(Severity::High),
    );
    checks.insert(
        ids::RULE_RESOURCE_SCOPING.to_string(),
        CheckPolicy::enabled(Severity::High),
    );
    checks.insert(
        ids::RULE_NO_WILDCARD_GRANT.to_string(),
        CheckPolicy::enabled(Severity::Critical),
    );
    checks.insert(
        ids::RULE_NON_INTERFERENCE.to_string(),
        CheckPolicy::enabled(Severity::Critical),
    );
    checks.insert(
        ids::RULE_MFA_GATING.to_string(),
        CheckPolicy::enabled(Severity::Critical),
    );
    checks.insert(
        ids::RULE_DENY_CONDITIONS.to_string(),
        CheckPolicy::enabled(Severity::Medium),
    );

    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Critical,
        max_results: 200,
        checks,
    }
}

/// Config with a single check enabled.
pub fn config_with_check(rule_id: &str, severity: Severity) -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(rule_id.to_string(), CheckPolicy::enabled(severity));
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Critical,
        max_results: 200,
        checks,
    }
}
