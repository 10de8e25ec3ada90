//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Compilation determinism and order-independence
//! - Statement merge soundness (no action lost, no effect crossed)
//! - Result ordering determinism in the validation engine

use crate::compile::compile_role;
use crate::engine::validate;
use crate::model::{Capability, Role, RoleCatalog, StatementLimits};
use crate::policy::{CheckPolicy, EffectiveConfig};
use crate::test_support::default_config;
use proptest::prelude::*;
use rolegate_types::{ConditionMap, ConditionValue, Effect, Severity, ValidationResult, ids};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Strategy for service-qualified action names. A small service alphabet
/// keeps merges likely; the verb alphabet mixes read-only and mutating verbs.
fn arb_action() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("ec2"),
            Just("s3"),
            Just("iam"),
            Just("ce"),
            Just("logs"),
        ],
        prop_oneof![
            Just("DescribeThings"),
            Just("GetItem"),
            Just("ListItems"),
            Just("StartThing"),
            Just("StopThing"),
            Just("DeleteItem"),
            Just("PutItem"),
        ],
    )
        .prop_map(|(svc, verb)| format!("{svc}:{verb}"))
}

/// Strategy for resource patterns, including the bare wildcard.
fn arb_resource() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*".to_string()),
        prop_oneof![Just("alpha"), Just("beta"), Just("gamma")]
            .prop_map(|stem| format!("arn:aws:s3:::{stem}-*")),
        prop_oneof![Just("one"), Just("two")]
            .prop_map(|name| format!("arn:aws:ec2:::instance/{name}")),
    ]
}

/// Strategy for a condition-set: empty, or a single boolean operator entry.
fn arb_conditions() -> impl Strategy<Value = ConditionMap> {
    prop_oneof![
        Just(ConditionMap::new()),
        prop_oneof![Just("true"), Just("false")].prop_map(|v| {
            let mut keys = BTreeMap::new();
            keys.insert(
                "mfa-present".to_string(),
                ConditionValue::One(v.to_string()),
            );
            let mut conditions = ConditionMap::new();
            conditions.insert("boolean".to_string(), keys);
            conditions
        }),
    ]
}

fn arb_effect() -> impl Strategy<Value = Effect> {
    prop_oneof![Just(Effect::Allow), Just(Effect::Deny)]
}

/// Strategy for one capability. Actions are service-qualified, so the
/// overly-broad-grant rejection never fires on generated input.
fn arb_capability() -> impl Strategy<Value = Capability> {
    (
        arb_effect(),
        prop::collection::vec(arb_action(), 1..4),
        prop::collection::vec(arb_resource(), 1..3),
        arb_conditions(),
    )
        .prop_map(|(effect, actions, resources, conditions)| Capability {
            effect,
            actions,
            resources,
            conditions,
        })
}

fn arb_role(name: &'static str) -> impl Strategy<Value = Role> {
    (prop::collection::vec(arb_capability(), 0..8), any::<bool>()).prop_map(
        move |(capabilities, requires_mfa)| Role {
            name: name.to_string(),
            requires_mfa,
            capabilities,
            resource_prefix: None,
            superset_of: BTreeSet::new(),
            limits: StatementLimits::default(),
        },
    )
}

/// Strategy for a synthetic ValidationResult (ordering tests).
fn arb_result() -> impl Strategy<Value = ValidationResult> {
    (
        prop_oneof![
            Just(Severity::Low),
            Just(Severity::Medium),
            Just(Severity::High),
            Just(Severity::Critical),
        ],
        prop_oneof![
            Just(ids::RULE_STRUCTURAL_LIMITS.to_string()),
            Just(ids::RULE_RESOURCE_SCOPING.to_string()),
            Just(ids::RULE_NON_INTERFERENCE.to_string()),
            Just(ids::RULE_MFA_GATING.to_string()),
        ],
        prop_oneof![
            Just(ids::CODE_TOO_MANY_STATEMENTS.to_string()),
            Just(ids::CODE_UNSCOPED_RESOURCE.to_string()),
            Just(ids::CODE_OVERLAPPING_GRANT.to_string()),
            Just(ids::CODE_MISSING_MFA_DENY.to_string()),
        ],
        "message [a-z]{1,16}",
        prop::option::of(prop_oneof![
            Just("developer".to_string()),
            Just("finance".to_string()),
            Just("auditor".to_string()),
        ]),
        prop::option::of(0u32..20),
        any::<bool>(),
    )
        .prop_map(
            |(severity, rule_id, code, message, role, statement, passed)| ValidationResult {
                severity,
                rule_id,
                code,
                passed,
                message,
                role,
                statement,
                fingerprint: None,
                data: serde_json::Value::Null,
            },
        )
}

fn config_all_disabled() -> EffectiveConfig {
    let mut cfg = default_config();
    for policy in cfg.checks.values_mut() {
        *policy = CheckPolicy::disabled();
    }
    cfg
}

// ============================================================================
// Property tests: compilation determinism
// ============================================================================

proptest! {
    /// The compiled policy is a pure function of the capability multiset:
    /// any permutation of the same capabilities yields the same statement
    /// sequence, byte for byte.
    #[test]
    fn compilation_is_order_independent(
        role in arb_role("subject"),
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;
        use rand::seq::SliceRandom;

        let mut shuffled = role.clone();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        shuffled.capabilities.shuffle(&mut rng);

        let a = compile_role(&role);
        let b = compile_role(&shuffled);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(
                    serde_json::to_string(&a).unwrap(),
                    serde_json::to_string(&b).unwrap()
                );
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "divergent outcomes: {a:?} vs {b:?}"),
        }
    }

    /// Compiling twice yields identical output (idempotence).
    #[test]
    fn compilation_is_idempotent(role in arb_role("subject")) {
        let a = compile_role(&role);
        let b = compile_role(&role);
        prop_assert_eq!(a, b);
    }

    /// Every Deny statement precedes every Allow statement in the output.
    #[test]
    fn deny_statements_precede_allow_statements(role in arb_role("subject")) {
        if let Ok(policy) = compile_role(&role) {
            let mut seen_allow = false;
            for statement in &policy.statements {
                match statement.effect {
                    Effect::Allow => seen_allow = true,
                    Effect::Deny => prop_assert!(
                        !seen_allow,
                        "Deny statement after an Allow in {:?}",
                        policy.statements
                    ),
                }
            }
        }
    }

    /// No statement in the output mixes actions from different services
    /// unless it came from a single cross-service capability: every merged
    /// statement's actions either share one service prefix or are contained
    /// in some input capability's action set. (Containment, not equality:
    /// the deny-wins tie-break may drop denied actions from a cross-service
    /// capability before grouping.)
    #[test]
    fn merged_statements_do_not_cross_services(role in arb_role("subject")) {
        if let Ok(policy) = compile_role(&role) {
            for statement in &policy.statements {
                if statement.actions.is_empty() {
                    continue;
                }
                let services: BTreeSet<&str> = statement
                    .actions
                    .iter()
                    .filter_map(|a| a.split(':').next())
                    .collect();
                if services.len() <= 1 {
                    continue;
                }
                let stmt_actions: BTreeSet<&str> =
                    statement.actions.iter().map(|s| s.as_str()).collect();
                let from_single_capability = role.capabilities.iter().any(|cap| {
                    let cap_actions: BTreeSet<&str> =
                        cap.actions.iter().map(|s| s.as_str()).collect();
                    stmt_actions.is_subset(&cap_actions)
                });
                prop_assert!(
                    from_single_capability,
                    "cross-service statement not traceable to one capability: {:?}",
                    statement.actions
                );
            }
        }
    }

    /// Roles requiring MFA always compile with exactly one statement carrying
    /// not_actions, and it sits at index 0.
    #[test]
    fn mfa_roles_carry_exactly_one_gate(role in arb_role("subject")) {
        if let Ok(policy) = compile_role(&role) {
            let gates: Vec<usize> = policy
                .statements
                .iter()
                .enumerate()
                .filter(|(_, s)| !s.not_actions.is_empty())
                .map(|(i, _)| i)
                .collect();
            if role.requires_mfa {
                prop_assert_eq!(gates.as_slice(), &[0]);
            } else {
                prop_assert!(gates.is_empty());
            }
        }
    }

    /// Merging never invents actions: every action in the output appears in
    /// some input capability.
    #[test]
    fn compilation_never_invents_actions(role in arb_role("subject")) {
        if let Ok(policy) = compile_role(&role) {
            let input_actions: BTreeSet<&str> = role
                .capabilities
                .iter()
                .flat_map(|c| c.actions.iter().map(|s| s.as_str()))
                .collect();
            for statement in &policy.statements {
                for action in &statement.actions {
                    prop_assert!(
                        input_actions.contains(action.as_str()),
                        "action '{}' not present in any capability",
                        action
                    );
                }
            }
        }
    }
}

// ============================================================================
// Property tests: validation engine determinism
// ============================================================================

proptest! {
    /// Validating the same compiled catalogue twice yields identical reports.
    #[test]
    fn validation_is_deterministic(
        a in arb_role("developer"),
        b in arb_role("finance"),
    ) {
        let mut catalog = RoleCatalog::default();
        catalog.roles.insert(a.name.clone(), a);
        catalog.roles.insert(b.name.clone(), b);
        let outcome = crate::compile::compile_catalog(&catalog);
        let cfg = default_config();

        let first = validate(&catalog, &outcome.policies, &outcome.errors, &cfg);
        let second = validate(&catalog, &outcome.policies, &outcome.errors, &cfg);
        prop_assert_eq!(first.status, second.status);
        prop_assert_eq!(first.results, second.results);
    }

    /// The engine never emits more results than max_results, and records a
    /// truncation reason exactly when it drops some.
    #[test]
    fn emitted_results_respect_max_results(
        role in arb_role("developer"),
        max_results in 1usize..10,
    ) {
        let mut catalog = RoleCatalog::default();
        catalog.roles.insert(role.name.clone(), role);
        let outcome = crate::compile::compile_catalog(&catalog);
        let mut cfg = default_config();
        cfg.max_results = max_results;

        let report = validate(&catalog, &outcome.policies, &outcome.errors, &cfg);
        prop_assert!(report.results.len() <= max_results);
        let dropped = report.data.results_total as usize > report.results.len();
        prop_assert_eq!(report.data.truncated_reason.is_some(), dropped);
    }

    /// With every check disabled and no compile errors, the engine reports
    /// a compliant empty result set.
    #[test]
    fn disabled_battery_reports_compliant(role in arb_role("developer")) {
        let mut catalog = RoleCatalog::default();
        catalog.roles.insert(role.name.clone(), role);
        let outcome = crate::compile::compile_catalog(&catalog);
        if !outcome.errors.is_empty() {
            return Ok(());
        }
        let cfg = config_all_disabled();
        let report = validate(&catalog, &outcome.policies, &outcome.errors, &cfg);
        prop_assert!(report.results.is_empty());
        prop_assert_eq!(report.status, rolegate_types::ComplianceStatus::Compliant);
    }

    /// Failed results always sort before passed ones, and severities are
    /// non-increasing within each group.
    #[test]
    fn result_ordering_groups_failures_first(
        results in prop::collection::vec(arb_result(), 0..30),
    ) {
        let mut sorted = results;
        sorted.sort_by(crate::engine::compare_results_for_tests);

        let mut seen_passed = false;
        let mut prev: Option<(bool, Severity)> = None;
        for r in &sorted {
            if r.passed {
                seen_passed = true;
            } else {
                prop_assert!(!seen_passed, "failed result after a passed one");
            }
            if let Some((passed, severity)) = prev {
                if passed == r.passed {
                    prop_assert!(severity >= r.severity, "severity order violation");
                }
            }
            prev = Some((r.passed, r.severity));
        }
    }
}
