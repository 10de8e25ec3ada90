//! The policy compiler: one role's capabilities -> a minimal, canonical
//! statement sequence.
//!
//! The whole pass is a pure function of the role. Merging is key-based, so
//! the output is independent of capability order by construction.

use crate::model::{Role, RoleCatalog, action_service};
use rayon::prelude::*;
use rolegate_types::consts::{
    MFA_ABSENT_VALUE, MFA_CONDITION_OPERATOR, MFA_CONTEXT_KEY, MFA_SELF_SERVICE_ACTIONS,
};
use rolegate_types::{CompiledPolicy, ConditionMap, ConditionValue, Effect, PolicyStatement};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Which structural ceiling a compiled policy exceeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitKind {
    Statements,
    ActionsPerStatement,
    ResourcesPerStatement,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitKind::Statements => write!(f, "statement"),
            LimitKind::ActionsPerStatement => write!(f, "per-statement action"),
            LimitKind::ResourcesPerStatement => write!(f, "per-statement resource"),
        }
    }
}

/// Policy-construction errors. Fatal to the role they name, never to the
/// rest of the catalogue.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error(
        "role '{role}': capability grants a bare wildcard action on the '*' resource; \
         scope either the action or the resource"
    )]
    OverlyBroadGrant { role: String },

    #[error("role '{role}': {kind} count {actual} exceeds the ceiling of {max}")]
    StatementLimitExceeded {
        role: String,
        kind: LimitKind,
        actual: usize,
        max: usize,
    },
}

impl CompileError {
    pub fn role(&self) -> &str {
        match self {
            CompileError::OverlyBroadGrant { role } => role,
            CompileError::StatementLimitExceeded { role, .. } => role,
        }
    }
}

/// Result of compiling a whole catalogue: a partial policy map plus the
/// per-role errors for the roles that failed.
#[derive(Clone, Debug, Default)]
pub struct CompileOutcome {
    pub policies: BTreeMap<String, CompiledPolicy>,
    pub errors: Vec<CompileError>,
}

/// Compile every role in the catalogue.
///
/// Roles are independent (each compilation reads only its own capabilities),
/// so the fan-out runs on the rayon pool; results are joined back in
/// catalogue order before returning.
pub fn compile_catalog(catalog: &RoleCatalog) -> CompileOutcome {
    let roles: Vec<&Role> = catalog.roles.values().collect();
    let compiled: Vec<Result<CompiledPolicy, CompileError>> =
        roles.par_iter().map(|role| compile_role(role)).collect();

    let mut outcome = CompileOutcome::default();
    for result in compiled {
        match result {
            Ok(policy) => {
                outcome.policies.insert(policy.role.clone(), policy);
            }
            Err(err) => outcome.errors.push(err),
        }
    }
    outcome
}

/// Compile one role into its canonical policy.
pub fn compile_role(role: &Role) -> Result<CompiledPolicy, CompileError> {
    reject_overly_broad(role)?;

    // Exact Deny tuples, used for the deny-wins tie-break below.
    let mut deny_tuples: BTreeSet<(String, String, String)> = BTreeSet::new();
    for cap in role.capabilities.iter().filter(|c| c.effect == Effect::Deny) {
        let cond_key = condition_key(&cap.conditions);
        for action in &cap.actions {
            for resource in &cap.resources {
                deny_tuples.insert((action.clone(), resource.clone(), cond_key.clone()));
            }
        }
    }

    // Key-based merge: same effect + same condition-set + identical resource
    // set + one shared service prefix -> union the action sets.
    let mut merged: BTreeMap<CandidateKey, BTreeSet<String>> = BTreeMap::new();
    let mut conditions_by_key: BTreeMap<String, ConditionMap> = BTreeMap::new();

    for cap in &role.capabilities {
        let cond_key = condition_key(&cap.conditions);
        conditions_by_key
            .entry(cond_key.clone())
            .or_insert_with(|| cap.conditions.clone());

        let mut actions: BTreeSet<String> = cap.actions.iter().cloned().collect();
        if cap.effect == Effect::Allow {
            // Deny wins: drop an Allow action when every one of its resources
            // is covered by an exact Deny tuple under the same conditions.
            actions.retain(|action| {
                !cap.resources.iter().all(|resource| {
                    deny_tuples.contains(&(action.clone(), resource.clone(), cond_key.clone()))
                })
            });
        }
        if actions.is_empty() {
            continue;
        }

        let resources: BTreeSet<String> = cap.resources.iter().cloned().collect();
        let key = CandidateKey::new(cap.effect, cond_key, resources, &actions);
        merged.entry(key).or_default().extend(actions);
    }

    let mut denies: Vec<PolicyStatement> = Vec::new();
    let mut allows: Vec<PolicyStatement> = Vec::new();
    for (key, actions) in merged {
        let statement = PolicyStatement {
            effect: key.effect,
            actions,
            not_actions: BTreeSet::new(),
            resources: key.resources,
            conditions: conditions_by_key
                .get(&key.condition_key)
                .cloned()
                .unwrap_or_default(),
        };
        match statement.effect {
            Effect::Deny => denies.push(statement),
            Effect::Allow => allows.push(statement),
        }
    }

    // Deny before Allow is a documentation convention only; explicit deny
    // wins regardless of sequence.
    let mut statements = Vec::with_capacity(denies.len() + allows.len() + 1);
    statements.extend(denies);
    statements.extend(allows);

    // Ceilings apply to the merge output; the synthesized MFA gate is a
    // fixed-shape statement and does not count against them.
    enforce_limits(role, &statements)?;

    if role.requires_mfa {
        statements.insert(0, mfa_deny_statement());
    }

    Ok(CompiledPolicy {
        role: role.name.clone(),
        statements,
    })
}

/// The canonical MFA gate: deny everything except the self-service actions
/// whenever the MFA context signal is absent.
pub fn mfa_deny_statement() -> PolicyStatement {
    let mut context = BTreeMap::new();
    context.insert(
        MFA_CONTEXT_KEY.to_string(),
        ConditionValue::One(MFA_ABSENT_VALUE.to_string()),
    );
    let mut conditions = ConditionMap::new();
    conditions.insert(MFA_CONDITION_OPERATOR.to_string(), context);

    PolicyStatement {
        effect: Effect::Deny,
        actions: BTreeSet::new(),
        not_actions: MFA_SELF_SERVICE_ACTIONS
            .iter()
            .map(|a| a.to_string())
            .collect(),
        resources: BTreeSet::from(["*".to_string()]),
        conditions,
    }
}

fn reject_overly_broad(role: &Role) -> Result<(), CompileError> {
    for cap in &role.capabilities {
        let wildcard_resource = cap.resources.iter().any(|r| r == "*");
        let bare_wildcard_action = cap.actions.iter().any(|a| !a.contains(':'));
        if cap.effect == Effect::Allow && wildcard_resource && bare_wildcard_action {
            return Err(CompileError::OverlyBroadGrant {
                role: role.name.clone(),
            });
        }
    }
    Ok(())
}

fn enforce_limits(role: &Role, statements: &[PolicyStatement]) -> Result<(), CompileError> {
    let limits = role.limits;
    if statements.len() > limits.max_statements {
        return Err(CompileError::StatementLimitExceeded {
            role: role.name.clone(),
            kind: LimitKind::Statements,
            actual: statements.len(),
            max: limits.max_statements,
        });
    }
    for statement in statements {
        let action_count = statement.actions.len().max(statement.not_actions.len());
        if action_count > limits.max_actions_per_statement {
            return Err(CompileError::StatementLimitExceeded {
                role: role.name.clone(),
                kind: LimitKind::ActionsPerStatement,
                actual: action_count,
                max: limits.max_actions_per_statement,
            });
        }
        if statement.resources.len() > limits.max_resources_per_statement {
            return Err(CompileError::StatementLimitExceeded {
                role: role.name.clone(),
                kind: LimitKind::ResourcesPerStatement,
                actual: statement.resources.len(),
                max: limits.max_resources_per_statement,
            });
        }
    }
    Ok(())
}

/// Canonical string form of a condition-set. BTreeMap serialization is
/// already sorted, so equal condition-sets always produce equal keys.
fn condition_key(conditions: &ConditionMap) -> String {
    serde_json::to_string(conditions).unwrap_or_default()
}

/// Grouping key for the statement merge.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CandidateKey {
    effect: Effect,
    condition_key: String,
    resources: BTreeSet<String>,
    /// Shared service prefix, or the full action set when the capability
    /// spans services (mixed candidates only merge with identical twins).
    service: String,
}

impl CandidateKey {
    fn new(
        effect: Effect,
        condition_key: String,
        resources: BTreeSet<String>,
        actions: &BTreeSet<String>,
    ) -> Self {
        let mut services: BTreeSet<&str> = BTreeSet::new();
        for action in actions {
            match action_service(action) {
                Some(svc) => {
                    services.insert(svc);
                }
                None => {
                    services.insert("*");
                }
            }
        }
        let service = if services.len() == 1 {
            format!("svc:{}", services.iter().next().map(|s| *s).unwrap_or("*"))
        } else {
            let joined: Vec<&str> = actions.iter().map(|s| s.as_str()).collect();
            format!("mixed:{}", joined.join(","))
        };
        Self {
            effect,
            condition_key,
            resources,
            service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capability, StatementLimits};
    use crate::test_support::{allow, deny, role_with, simple_role};

    #[test]
    fn developer_scenario_merges_same_service_statements() {
        // 2 ec2 mutation grants + 1 ec2 describe grant merge into one
        // statement; the s3 grant stays separate; MFA deny is synthesized.
        let role = role_with(
            "developer",
            true,
            vec![
                allow(&["ec2:DescribeInstances"], &["*"]),
                allow(&["ec2:StartInstances"], &["*"]),
                allow(&["ec2:StopInstances"], &["*"]),
                allow(&["s3:GetObject"], &["arn:aws:s3:::app-*/*"]),
            ],
        );

        let policy = compile_role(&role).expect("compiles");
        assert_eq!(policy.statements.len(), 3);

        let mfa = &policy.statements[0];
        assert_eq!(mfa.effect, Effect::Deny);
        assert_eq!(mfa.not_actions.len(), MFA_SELF_SERVICE_ACTIONS.len());

        let ec2 = policy
            .statements
            .iter()
            .find(|s| s.actions.contains("ec2:StartInstances"))
            .expect("merged ec2 statement");
        assert_eq!(ec2.actions.len(), 3);
        assert!(ec2.actions.contains("ec2:DescribeInstances"));
        assert!(ec2.actions.contains("ec2:StopInstances"));

        let s3 = policy
            .statements
            .iter()
            .find(|s| s.actions.contains("s3:GetObject"))
            .expect("s3 statement");
        assert_eq!(s3.resources.iter().next().map(|s| s.as_str()), Some("arn:aws:s3:::app-*/*"));
    }

    #[test]
    fn bare_wildcard_on_wildcard_resource_is_rejected() {
        let role = role_with("admin", false, vec![allow(&["*"], &["*"])]);
        let err = compile_role(&role).expect_err("must reject");
        assert_eq!(
            err,
            CompileError::OverlyBroadGrant {
                role: "admin".to_string()
            }
        );
    }

    #[test]
    fn service_scoped_wildcard_on_wildcard_resource_is_allowed_by_compiler() {
        // `ce:*` on `*` is not a bare wildcard action; scoping is the
        // validator's concern, not a compile error.
        let role = role_with("finance", false, vec![allow(&["ce:*"], &["*"])]);
        assert!(compile_role(&role).is_ok());
    }

    #[test]
    fn statement_limit_violations_are_errors_not_truncation() {
        // 25 distinct service/resource groups cannot merge below 25.
        let caps: Vec<Capability> = (0..25)
            .map(|i| allow(&[&format!("svc{i}:Write")], &[&format!("arn:aws:svc{i}:::thing-*")]))
            .collect();
        let role = role_with("sprawl", false, caps);

        let err = compile_role(&role).expect_err("limit exceeded");
        match err {
            CompileError::StatementLimitExceeded {
                role, kind, actual, max,
            } => {
                assert_eq!(role, "sprawl");
                assert_eq!(kind, LimitKind::Statements);
                assert_eq!(actual, 25);
                assert_eq!(max, 20);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn per_statement_action_ceiling_is_enforced() {
        let actions: Vec<String> = (0..60).map(|i| format!("svc:Op{i:02}")).collect();
        let action_refs: Vec<&str> = actions.iter().map(|s| s.as_str()).collect();
        let mut role = role_with("wide", false, vec![allow(&action_refs, &["arn:aws:svc:::x-*"])]);
        role.limits = StatementLimits::default();

        let err = compile_role(&role).expect_err("too many actions");
        assert!(matches!(
            err,
            CompileError::StatementLimitExceeded {
                kind: LimitKind::ActionsPerStatement,
                actual: 60,
                max: 50,
                ..
            }
        ));
    }

    #[test]
    fn mfa_gate_does_not_count_against_statement_ceiling() {
        // Exactly at the ceiling: 20 unmergeable groups plus the gate.
        let caps: Vec<Capability> = (0..20)
            .map(|i| allow(&[&format!("svc{i}:Write")], &[&format!("arn:aws:svc{i}:::thing-*")]))
            .collect();
        let role = role_with("saturated", true, caps);

        let policy = compile_role(&role).expect("compiles at the ceiling");
        assert_eq!(policy.statements.len(), 21);
        assert!(!policy.statements[0].not_actions.is_empty());
    }

    #[test]
    fn deny_filtered_cross_service_statement_keeps_remaining_actions() {
        // The exact deny strips iam:PutItem from the mixed grant; the rest
        // of the capability still compiles as one cross-service statement.
        let role = role_with(
            "mixed-deny",
            false,
            vec![
                allow(
                    &["ec2:DescribeThings", "s3:DescribeThings", "iam:PutItem"],
                    &["*"],
                ),
                deny(&["iam:PutItem"], &["*"]),
            ],
        );
        let policy = compile_role(&role).expect("compiles");

        assert_eq!(policy.statements.len(), 2);
        assert_eq!(policy.statements[0].effect, Effect::Deny);
        assert!(policy.statements[0].actions.contains("iam:PutItem"));

        let allow_stmt = &policy.statements[1];
        assert_eq!(allow_stmt.effect, Effect::Allow);
        assert_eq!(allow_stmt.actions.len(), 2);
        assert!(allow_stmt.actions.contains("ec2:DescribeThings"));
        assert!(allow_stmt.actions.contains("s3:DescribeThings"));
        assert!(!allow_stmt.actions.contains("iam:PutItem"));
    }

    #[test]
    fn empty_role_with_mfa_compiles_to_single_deny() {
        let role = simple_role("auditor", true);
        let policy = compile_role(&role).expect("valid");
        assert_eq!(policy.statements.len(), 1);
        assert_eq!(policy.statements[0], mfa_deny_statement());
    }

    #[test]
    fn empty_role_without_mfa_compiles_to_empty_sequence() {
        let role = simple_role("ghost", false);
        let policy = compile_role(&role).expect("valid");
        assert!(policy.statements.is_empty());
    }

    #[test]
    fn deny_wins_on_exact_tuple_conflict() {
        let role = role_with(
            "conflicted",
            false,
            vec![
                allow(&["s3:DeleteObject"], &["arn:aws:s3:::app-logs/*"]),
                deny(&["s3:DeleteObject"], &["arn:aws:s3:::app-logs/*"]),
            ],
        );
        let policy = compile_role(&role).expect("compiles");

        // The allow side is dropped entirely; only the deny remains.
        assert_eq!(policy.statements.len(), 1);
        assert_eq!(policy.statements[0].effect, Effect::Deny);
        assert!(policy.statements[0].actions.contains("s3:DeleteObject"));
    }

    #[test]
    fn deny_with_different_conditions_does_not_cancel_allow() {
        let mut conditional_deny = deny(&["s3:DeleteObject"], &["arn:aws:s3:::app-logs/*"]);
        let mut context = BTreeMap::new();
        context.insert(
            "source-ip".to_string(),
            ConditionValue::One("10.0.0.0/8".to_string()),
        );
        conditional_deny
            .conditions
            .insert("ip-address".to_string(), context);

        let role = role_with(
            "conditional",
            false,
            vec![
                allow(&["s3:DeleteObject"], &["arn:aws:s3:::app-logs/*"]),
                conditional_deny,
            ],
        );
        let policy = compile_role(&role).expect("compiles");
        assert_eq!(policy.statements.len(), 2);
        assert_eq!(policy.statements[0].effect, Effect::Deny);
        assert_eq!(policy.statements[1].effect, Effect::Allow);
    }

    #[test]
    fn statements_with_different_conditions_never_merge() {
        let mut gated = allow(&["ec2:StartInstances"], &["*"]);
        let mut context = BTreeMap::new();
        context.insert("mfa-present".to_string(), ConditionValue::One("true".to_string()));
        gated.conditions.insert("bool".to_string(), context);

        let role = role_with(
            "split",
            false,
            vec![allow(&["ec2:StopInstances"], &["*"]), gated],
        );
        let policy = compile_role(&role).expect("compiles");
        assert_eq!(policy.statements.len(), 2);
    }

    #[test]
    fn mixed_service_capability_stays_unmerged() {
        let role = role_with(
            "mixed",
            false,
            vec![
                allow(&["ec2:DescribeInstances", "s3:GetObject"], &["*"]),
                allow(&["ec2:StartInstances"], &["*"]),
            ],
        );
        let policy = compile_role(&role).expect("compiles");
        // The cross-service capability cannot be merged with the ec2-only one.
        assert_eq!(policy.statements.len(), 2);
    }

    #[test]
    fn compilation_is_invariant_under_capability_reordering() {
        let caps = vec![
            allow(&["ec2:DescribeInstances"], &["*"]),
            allow(&["ec2:StartInstances"], &["*"]),
            allow(&["s3:GetObject"], &["arn:aws:s3:::app-*/*"]),
            deny(&["s3:DeleteObject"], &["arn:aws:s3:::app-*/*"]),
        ];
        let forward = role_with("developer", true, caps.clone());
        let mut reversed_caps = caps;
        reversed_caps.reverse();
        let reversed = role_with("developer", true, reversed_caps);

        let a = compile_role(&forward).expect("compiles");
        let b = compile_role(&reversed).expect("compiles");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn catalog_compilation_reports_partial_results() {
        let mut catalog = RoleCatalog::default();
        let good = role_with("reader", false, vec![allow(&["s3:GetObject"], &["arn:aws:s3:::data-*"])]);
        let bad = role_with("root", false, vec![allow(&["*"], &["*"])]);
        catalog.roles.insert(good.name.clone(), good);
        catalog.roles.insert(bad.name.clone(), bad);

        let outcome = compile_catalog(&catalog);
        assert_eq!(outcome.policies.len(), 1);
        assert!(outcome.policies.contains_key("reader"));
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].role(), "root");
    }
}
