use rolegate_types::consts::{
    DEFAULT_MAX_ACTIONS_PER_STATEMENT, DEFAULT_MAX_RESOURCES_PER_STATEMENT, DEFAULT_MAX_STATEMENTS,
};
use rolegate_types::{ConditionMap, Effect};
use std::collections::{BTreeMap, BTreeSet};

/// The loaded role catalogue: role name -> role, keys unique.
///
/// Defined once per compilation input; never mutated after load.
#[derive(Clone, Debug, Default)]
pub struct RoleCatalog {
    pub roles: BTreeMap<String, Role>,
}

impl RoleCatalog {
    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }
}

/// A single requested permission grant or denial with optional conditions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capability {
    pub effect: Effect,
    /// Action patterns, optionally with a trailing wildcard (`ec2:*`).
    pub actions: Vec<String>,
    /// Resource patterns: `*` or a prefix pattern (`arn:...:app-*`).
    pub resources: Vec<String>,
    pub conditions: ConditionMap,
}

/// Per-role structural ceilings, mirroring managed-policy limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatementLimits {
    pub max_statements: usize,
    pub max_actions_per_statement: usize,
    pub max_resources_per_statement: usize,
}

impl Default for StatementLimits {
    fn default() -> Self {
        Self {
            max_statements: DEFAULT_MAX_STATEMENTS,
            max_actions_per_statement: DEFAULT_MAX_ACTIONS_PER_STATEMENT,
            max_resources_per_statement: DEFAULT_MAX_RESOURCES_PER_STATEMENT,
        }
    }
}

/// A named collection of capabilities plus its scoping metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    /// Must be explicit in the input; the loader rejects catalogues that
    /// leave it out.
    pub requires_mfa: bool,
    pub capabilities: Vec<Capability>,
    /// Declared resource-prefix convention (e.g. `arn:...:data-*`).
    /// Scoping and non-interference checks use it when present.
    pub resource_prefix: Option<String>,
    /// Roles this role may legitimately subsume (exempt from the
    /// non-interference check in that direction).
    pub superset_of: BTreeSet<String>,
    pub limits: StatementLimits,
}

impl Role {
    pub fn is_superset_of(&self, other: &str) -> bool {
        self.superset_of.contains(other)
    }
}

/// Service prefix of an action pattern: `ec2:RunInstances` -> `ec2`.
/// A colon-free pattern (bare `*`) has no service.
pub fn action_service(action: &str) -> Option<&str> {
    action.split_once(':').map(|(svc, _)| svc)
}

/// Verb part of an action pattern: `ec2:RunInstances` -> `RunInstances`.
pub fn action_verb(action: &str) -> Option<&str> {
    action.split_once(':').map(|(_, verb)| verb)
}

/// Whether an action belongs to the read-only verb class
/// (Describe/Get/List/View). Wildcard verbs are not read-only.
pub fn is_read_only_action(action: &str) -> bool {
    match action_verb(action) {
        Some(verb) => rolegate_types::consts::READ_ONLY_VERB_PREFIXES
            .iter()
            .any(|p| verb.starts_with(p)),
        None => false,
    }
}

/// Whether two trailing-wildcard patterns can match a common value.
///
/// Patterns are literal except for an optional trailing `*`. `*` alone
/// overlaps everything.
pub fn patterns_overlap(a: &str, b: &str) -> bool {
    if a == "*" || b == "*" {
        return true;
    }
    let a_prefix = a.strip_suffix('*');
    let b_prefix = b.strip_suffix('*');
    match (a_prefix, b_prefix) {
        (None, None) => a == b,
        (Some(ap), None) => b.starts_with(ap),
        (None, Some(bp)) => a.starts_with(bp),
        (Some(ap), Some(bp)) => ap.starts_with(bp) || bp.starts_with(ap),
    }
}

/// Whether a resource pattern falls inside a declared prefix convention.
pub fn matches_prefix(resource: &str, prefix: &str) -> bool {
    let prefix_lit = prefix.strip_suffix('*').unwrap_or(prefix);
    let resource_lit = resource.strip_suffix('*').unwrap_or(resource);
    resource_lit.starts_with(prefix_lit)
}
