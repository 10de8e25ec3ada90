use crate::model::RoleCatalog;
use crate::policy::EffectiveConfig;
use rolegate_types::{CompiledPolicy, ValidationResult, ids};
use std::collections::BTreeMap;

mod deny_conditions;
mod explicit_fields;
mod mfa_gating;
mod non_interference;
mod resource_scoping;
mod structural_limits;
mod utils;
mod wildcard_grant;


pub type CheckFn =
    fn(&RoleCatalog, &BTreeMap<String, CompiledPolicy>, &EffectiveConfig, &mut Vec<ValidationResult>);

/// The fixed battery, in specification order. Each check is independent and
/// side-effect-free; ordering here is presentation, not semantics.
pub fn battery() -> &'static [(&'static str, CheckFn)] {
    &[
        (ids::RULE_STRUCTURAL_LIMITS, structural_limits::run),
        (ids::RULE_EXPLICIT_FIELDS, explicit_fields::run),
        (ids::RULE_RESOURCE_SCOPING, resource_scoping::run),
        (ids::RULE_NO_WILDCARD_GRANT, wildcard_grant::run),
        (ids::RULE_NON_INTERFERENCE, non_interference::run),
        (ids::RULE_MFA_GATING, mfa_gating::run),
        (ids::RULE_DENY_CONDITIONS, deny_conditions::run),
    ]
}

pub fn run_all(
    catalog: &RoleCatalog,
    policies: &BTreeMap<String, CompiledPolicy>,
    cfg: &EffectiveConfig,
    out: &mut Vec<ValidationResult>,
) {
    for (_, check) in battery() {
        check(catalog, policies, cfg, out);
    }
}
