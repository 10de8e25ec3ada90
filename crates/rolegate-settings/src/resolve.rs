use crate::{model::RolegateConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use rolegate_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use rolegate_types::Severity;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_on: Option<String>,
    pub max_results: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: RolegateConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile);

    if let Some(mr) = overrides.max_results.or(cfg.max_results) {
        effective.max_results = mr as usize;
    }

    // per-check overrides
    for (rule_id, cc) in cfg.checks.iter() {
        let entry = effective
            .checks
            .entry(rule_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?;
        }
        if !cc.allow.is_empty() {
            validate_allowlist(rule_id, &cc.allow)?;
            entry.allow = cc.allow.clone();
        }
    }

    // fail_on: CLI override beats config
    if let Some(fail_on_s) = overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { effective })
}

fn validate_allowlist(rule_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "low" => Ok(Severity::Low),
        "medium" => Ok(Severity::Medium),
        "high" => Ok(Severity::High),
        "critical" => Ok(Severity::Critical),
        other => anyhow::bail!("unknown severity: {other} (expected low|medium|high|critical)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "critical" => Ok(FailOn::Critical),
        "high" => Ok(FailOn::High),
        other => anyhow::bail!("unknown fail_on: {other} (expected critical|high)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use rolegate_types::ids;

    #[test]
    fn empty_config_resolves_to_strict_defaults() {
        let cfg = parse_config_toml("").expect("parses");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolves");

        assert_eq!(resolved.effective.profile, "strict");
        assert_eq!(resolved.effective.fail_on, FailOn::Critical);
        assert_eq!(resolved.effective.max_results, 200);
        assert_eq!(resolved.effective.checks.len(), 7);
        let wildcard = &resolved.effective.checks[ids::RULE_NO_WILDCARD_GRANT];
        assert!(wildcard.enabled);
        assert_eq!(wildcard.severity, Severity::Critical);
    }

    #[test]
    fn per_check_overrides_apply() {
        let toml = r#"
            profile = "strict"

            [checks."policy.deny_conditions"]
            severity = "high"

            [checks."roles.mfa_gating"]
            enabled = false

            [checks."policy.structural_limits"]
            allow = ["legacy-*"]
        "#;
        let cfg = parse_config_toml(toml).expect("parses");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolves");

        let deny = &resolved.effective.checks[ids::RULE_DENY_CONDITIONS];
        assert_eq!(deny.severity, Severity::High);
        assert!(!resolved.effective.checks[ids::RULE_MFA_GATING].enabled);
        assert_eq!(
            resolved.effective.checks[ids::RULE_STRUCTURAL_LIMITS].allow,
            vec!["legacy-*".to_string()]
        );
    }

    #[test]
    fn cli_overrides_beat_file_values() {
        let toml = r#"
            profile = "strict"
            fail_on = "critical"
            max_results = 50
        "#;
        let cfg = parse_config_toml(toml).expect("parses");
        let resolved = resolve_config(
            cfg,
            Overrides {
                profile: Some("audit".to_string()),
                fail_on: Some("high".to_string()),
                max_results: Some(10),
            },
        )
        .expect("resolves");

        assert_eq!(resolved.effective.profile, "audit");
        assert_eq!(resolved.effective.fail_on, FailOn::High);
        assert_eq!(resolved.effective.max_results, 10);
    }

    #[test]
    fn invalid_severity_is_rejected() {
        let toml = r#"
            [checks."policy.resource_scoping"]
            severity = "fatal"
        "#;
        let cfg = parse_config_toml(toml).expect("parses");
        assert!(resolve_config(cfg, Overrides::default()).is_err());
    }

    #[test]
    fn invalid_fail_on_is_rejected() {
        let cfg = parse_config_toml(r#"fail_on = "never""#).expect("parses");
        assert!(resolve_config(cfg, Overrides::default()).is_err());
    }

    #[test]
    fn invalid_allow_glob_is_rejected() {
        let toml = r#"
            [checks."roles.non_interference"]
            allow = ["[unclosed"]
        "#;
        let cfg = parse_config_toml(toml).expect("parses");
        assert!(resolve_config(cfg, Overrides::default()).is_err());
    }

    #[test]
    fn unknown_rule_ids_start_disabled() {
        // Writing config for a rule the preset does not know keeps it off
        // unless enabled explicitly.
        let toml = r#"
            [checks."policy.future_rule"]
            severity = "low"
        "#;
        let cfg = parse_config_toml(toml).expect("parses");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolves");
        assert!(!resolved.effective.checks["policy.future_rule"].enabled);
    }

    #[test]
    fn audit_profile_raises_result_ceiling() {
        let cfg = parse_config_toml(r#"profile = "audit""#).expect("parses");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolves");
        assert_eq!(resolved.effective.profile, "audit");
        assert_eq!(resolved.effective.max_results, 1000);
    }
}
