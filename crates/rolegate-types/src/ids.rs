//! Stable identifiers for invariant checks and result codes.
//!
//! `rule_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks, in battery order.
pub const RULE_STRUCTURAL_LIMITS: &str = "policy.structural_limits";
pub const RULE_EXPLICIT_FIELDS: &str = "policy.explicit_fields";
pub const RULE_RESOURCE_SCOPING: &str = "policy.resource_scoping";
pub const RULE_NO_WILDCARD_GRANT: &str = "policy.no_wildcard_grant";
pub const RULE_NON_INTERFERENCE: &str = "roles.non_interference";
pub const RULE_MFA_GATING: &str = "roles.mfa_gating";
pub const RULE_DENY_CONDITIONS: &str = "policy.deny_conditions";

// Codes: policy.structural_limits
pub const CODE_TOO_MANY_STATEMENTS: &str = "too_many_statements";
pub const CODE_TOO_MANY_ACTIONS: &str = "too_many_actions";
pub const CODE_TOO_MANY_RESOURCES: &str = "too_many_resources";
pub const CODE_DOCUMENT_TOO_LARGE: &str = "document_too_large";

// Codes: policy.explicit_fields
pub const CODE_EMPTY_STATEMENT: &str = "empty_statement";
pub const CODE_ACTIONS_AND_NOT_ACTIONS: &str = "actions_and_not_actions";

// Codes: policy.resource_scoping
pub const CODE_UNSCOPED_RESOURCE: &str = "unscoped_resource";
pub const CODE_WILDCARD_RESOURCE_MUTATION: &str = "wildcard_resource_for_mutation";

// Codes: policy.no_wildcard_grant
pub const CODE_WILDCARD_ACTION_AND_RESOURCE: &str = "wildcard_action_and_resource";

// Codes: roles.non_interference
pub const CODE_OVERLAPPING_GRANT: &str = "overlapping_grant";

// Codes: roles.mfa_gating
pub const CODE_MISSING_MFA_DENY: &str = "missing_mfa_deny";
pub const CODE_DUPLICATE_MFA_DENY: &str = "duplicate_mfa_deny";
pub const CODE_MALFORMED_MFA_DENY: &str = "malformed_mfa_deny";

// Codes: policy.deny_conditions
pub const CODE_UNKNOWN_CONDITION_OPERATOR: &str = "unknown_condition_operator";

// Compile-stage results (per-role construction failures surfaced as findings).
pub const RULE_COMPILE: &str = "policy.compile";
pub const CODE_STATEMENT_LIMIT_EXCEEDED: &str = "statement_limit_exceeded";
pub const CODE_OVERLY_BROAD_GRANT: &str = "overly_broad_grant";

// Synthesized by the engine for checks that emitted no violations.
pub const CODE_CHECK_PASSED: &str = "check_passed";

// Tool-level
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
