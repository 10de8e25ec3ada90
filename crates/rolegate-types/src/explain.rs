//! Explain registry for invariant checks and result codes.
//!
//! Maps rule IDs and codes to human-readable explanations with remediation
//! guidance.

use crate::ids;

/// Explanation entry for a rule or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
}

/// Look up an explanation by rule_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    // Try rule_id first, then code
    match identifier {
        // Rule IDs
        ids::RULE_STRUCTURAL_LIMITS => Some(explain_structural_limits()),
        ids::RULE_EXPLICIT_FIELDS => Some(explain_explicit_fields()),
        ids::RULE_RESOURCE_SCOPING => Some(explain_resource_scoping()),
        ids::RULE_NO_WILDCARD_GRANT => Some(explain_no_wildcard_grant()),
        ids::RULE_NON_INTERFERENCE => Some(explain_non_interference()),
        ids::RULE_MFA_GATING => Some(explain_mfa_gating()),
        ids::RULE_DENY_CONDITIONS => Some(explain_deny_conditions()),

        // Codes
        ids::CODE_TOO_MANY_STATEMENTS
        | ids::CODE_TOO_MANY_ACTIONS
        | ids::CODE_TOO_MANY_RESOURCES
        | ids::CODE_DOCUMENT_TOO_LARGE => Some(explain_structural_limits()),
        ids::CODE_EMPTY_STATEMENT | ids::CODE_ACTIONS_AND_NOT_ACTIONS => {
            Some(explain_explicit_fields())
        }
        ids::CODE_UNSCOPED_RESOURCE | ids::CODE_WILDCARD_RESOURCE_MUTATION => {
            Some(explain_resource_scoping())
        }
        ids::CODE_WILDCARD_ACTION_AND_RESOURCE => Some(explain_no_wildcard_grant()),
        ids::CODE_OVERLAPPING_GRANT => Some(explain_non_interference()),
        ids::CODE_MISSING_MFA_DENY | ids::CODE_DUPLICATE_MFA_DENY | ids::CODE_MALFORMED_MFA_DENY => {
            Some(explain_mfa_gating())
        }
        ids::CODE_UNKNOWN_CONDITION_OPERATOR => Some(explain_deny_conditions()),
        ids::CODE_OVERLY_BROAD_GRANT | ids::CODE_STATEMENT_LIMIT_EXCEEDED => {
            Some(explain_compile_errors())
        }

        _ => None,
    }
}

/// List all known rule IDs.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_STRUCTURAL_LIMITS,
        ids::RULE_EXPLICIT_FIELDS,
        ids::RULE_RESOURCE_SCOPING,
        ids::RULE_NO_WILDCARD_GRANT,
        ids::RULE_NON_INTERFERENCE,
        ids::RULE_MFA_GATING,
        ids::RULE_DENY_CONDITIONS,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_TOO_MANY_STATEMENTS,
        ids::CODE_TOO_MANY_ACTIONS,
        ids::CODE_TOO_MANY_RESOURCES,
        ids::CODE_DOCUMENT_TOO_LARGE,
        ids::CODE_EMPTY_STATEMENT,
        ids::CODE_ACTIONS_AND_NOT_ACTIONS,
        ids::CODE_UNSCOPED_RESOURCE,
        ids::CODE_WILDCARD_RESOURCE_MUTATION,
        ids::CODE_WILDCARD_ACTION_AND_RESOURCE,
        ids::CODE_OVERLAPPING_GRANT,
        ids::CODE_MISSING_MFA_DENY,
        ids::CODE_DUPLICATE_MFA_DENY,
        ids::CODE_MALFORMED_MFA_DENY,
        ids::CODE_UNKNOWN_CONDITION_OPERATOR,
        ids::CODE_STATEMENT_LIMIT_EXCEEDED,
        ids::CODE_OVERLY_BROAD_GRANT,
    ]
}

fn explain_structural_limits() -> Explanation {
    Explanation {
        title: "Structural Limits",
        description: "\
Compiled policies must stay within the managed-policy ceilings: statement
count, actions per statement, resources per statement, and serialized
document size (6144 bytes). Oversized policies are rejected by the platform
at attach time, so catching them here keeps failures local and typed.",
        remediation: "\
Split the role into narrower roles, tighten capability grants so more of
them merge into shared statements, or raise the role's declared ceilings if
the target platform allows it.",
    }
}

fn explain_explicit_fields() -> Explanation {
    Explanation {
        title: "Explicit Statement Fields",
        description: "\
Every statement must carry an effect and exactly one of `actions` or
`not_actions`, never both and never neither. Statements that match nothing
are dead weight; statements with both fields have ambiguous semantics.",
        remediation: "\
Remove empty statements. If a statement needs both an action list and an
exclusion list, split it into two statements with a single list each.",
    }
}

fn explain_resource_scoping() -> Explanation {
    Explanation {
        title: "Resource Scoping",
        description: "\
A role's resource patterns must match the role's declared prefix convention
(e.g. role `analyst` only touches `arn:...:data-*`). The universal `*`
resource is tolerated only on statements whose every action is read-only
(Describe/Get/List/View verbs).",
        remediation: "\
Scope each capability's resource patterns to the role's declared prefix, or
declare the prefix on the role if it is missing. Keep `*` for describe-class
access only.",
    }
}

fn explain_no_wildcard_grant() -> Explanation {
    Explanation {
        title: "No Wildcard Action And Resource",
        description: "\
No statement may combine `actions = [\"*\"]` with `resources = [\"*\"]`.
That combination is full administrative access and defeats every other
control in the catalogue. This is the strongest built-in rule and it is not
configurable below critical.",
        remediation: "\
Enumerate the services the role actually needs (`svc:*` per service is
acceptable) and scope resources to the role's prefix convention.",
    }
}

fn explain_non_interference() -> Explanation {
    Explanation {
        title: "Cross-Role Non-Interference",
        description: "\
No role may implicitly gain another role's mutating capabilities through
merge or wildcard overlap. For every role pair where neither declares the
other in `supersetOf`, the overlap of their Allow statements on mutating
actions over overlapping resources must be empty.",
        remediation: "\
Remove the overlapping grant from one of the roles, or declare an explicit
superset relationship if the subsumption is intended.",
    }
}

fn explain_mfa_gating() -> Explanation {
    Explanation {
        title: "MFA Gating",
        description: "\
Roles with `requiresMFA: true` must compile to exactly one synthesized deny
statement that blocks everything except the fixed MFA self-service action
list whenever the `mfa-present` context signal is absent. Zero, duplicate,
or reshaped MFA deny statements all fail this check.",
        remediation: "\
Do not hand-write MFA deny statements in the capability list; set
`requiresMFA: true` and let the compiler synthesize the canonical one.",
    }
}

fn explain_deny_conditions() -> Explanation {
    Explanation {
        title: "Deny Condition Operators",
        description: "\
Conditions on Deny statements must use operators from the fixed allow-list.
An unrecognized operator is silently ignored by most policy evaluators,
which would turn a guard rail into a no-op.",
        remediation: "\
Use one of the recognized operators (boolean-if-exists, string-equals,
string-like, ...). Check for typos and casing.",
    }
}

fn explain_compile_errors() -> Explanation {
    Explanation {
        title: "Policy Construction Errors",
        description: "\
Per-role compilation failures: a capability requesting a bare wildcard
action on the `*` resource (overly broad grant), or a compiled policy that
exceeds the role's statement/action/resource ceilings. These are typed
errors, not findings; the offending role gets no policy while sibling roles
still compile.",
        remediation: "\
Narrow the offending capability or split the role. The error message names
the role and the ceiling that was exceeded.",
    }
}
