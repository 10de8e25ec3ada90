//! Process-wide policy constants.
//!
//! These are defined exactly once and referenced by value everywhere; checks
//! and the compiler must never re-declare them locally.

/// Self-service actions a principal needs in order to set up MFA in the
/// first place. The synthesized MFA deny statement carries these as
/// `not_actions` so a user without an MFA session can still enroll a device.
pub const MFA_SELF_SERVICE_ACTIONS: &[&str] = &[
    "iam:CreateVirtualMFADevice",
    "iam:EnableMFADevice",
    "iam:ListMFADevices",
    "iam:ListVirtualMFADevices",
    "iam:ResyncMFADevice",
    "sts:GetSessionToken",
];

/// Condition operator used by the synthesized MFA deny statement.
pub const MFA_CONDITION_OPERATOR: &str = "boolean-if-exists";

/// Context key the MFA deny statement tests.
pub const MFA_CONTEXT_KEY: &str = "mfa-present";

/// Expected value: the deny fires when the MFA signal is absent or false.
pub const MFA_ABSENT_VALUE: &str = "false";

/// Condition operators a `Deny` statement may use.
pub const ALLOWED_CONDITION_OPERATORS: &[&str] = &[
    "boolean-if-exists",
    "bool",
    "string-equals",
    "string-not-equals",
    "string-like",
    "arn-like",
    "numeric-equals",
    "numeric-less-than",
    "ip-address",
];

/// Action verb prefixes considered read-only. Statements whose every action
/// verb starts with one of these may target the `*` resource.
pub const READ_ONLY_VERB_PREFIXES: &[&str] = &["Describe", "Get", "List", "View"];

/// Managed-policy document size ceiling, in serialized JSON bytes.
pub const MAX_POLICY_DOCUMENT_BYTES: usize = 6144;

/// Default per-role statement count ceiling.
pub const DEFAULT_MAX_STATEMENTS: usize = 20;

/// Default per-statement action count ceiling.
pub const DEFAULT_MAX_ACTIONS_PER_STATEMENT: usize = 50;

/// Default per-statement resource count ceiling.
pub const DEFAULT_MAX_RESOURCES_PER_STATEMENT: usize = 20;
