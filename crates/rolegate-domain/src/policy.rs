use rolegate_types::Severity;
use std::collections::BTreeMap;

/// Which failing severity flips the overall status to non-compliant.
/// Critical always does; `High` additionally promotes high findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Critical,
    High,
}

#[derive(Clone, Debug)]
pub struct CheckPolicy {
    pub enabled: bool,
    pub severity: Severity,
    /// Glob patterns naming roles exempt from the check.
    pub allow: Vec<String>,
}

impl CheckPolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            allow: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Low,
            allow: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub max_results: usize,
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl EffectiveConfig {
    pub fn check_policy(&self, rule_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(rule_id).filter(|p| p.enabled)
    }
}
