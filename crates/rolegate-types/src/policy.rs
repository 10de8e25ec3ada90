use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Statement effect. `Deny` always wins over `Allow` regardless of order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// Expected value(s) for a condition context key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ConditionValue {
    One(String),
    Many(Vec<String>),
}

/// Condition operator -> (context key -> expected value(s)).
///
/// BTreeMaps keep serialization canonical, which the compiler relies on when
/// grouping capabilities by condition-set.
pub type ConditionMap = BTreeMap<String, BTreeMap<String, ConditionValue>>;

/// The compiled, minimal policy unit.
///
/// Invariants (enforced by the compiler, re-checked by the validator):
/// - `actions` and `not_actions` are mutually exclusive; at least one is
///   non-empty
/// - every resource is `*` or follows the role's scoping convention
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyStatement {
    pub effect: Effect,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub actions: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub not_actions: BTreeSet<String>,

    pub resources: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: ConditionMap,
}

impl PolicyStatement {
    pub fn allow(actions: BTreeSet<String>, resources: BTreeSet<String>) -> Self {
        Self {
            effect: Effect::Allow,
            actions,
            not_actions: BTreeSet::new(),
            resources,
            conditions: ConditionMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.not_actions.is_empty()
    }
}

/// One role's compiled policy: an ordered statement sequence.
///
/// Statement order is a documentation convention only (`Deny` first);
/// evaluation semantics are order-independent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompiledPolicy {
    pub role: String,
    pub statements: Vec<PolicyStatement>,
}

impl CompiledPolicy {
    /// Serialized JSON size, used against the document byte ceiling.
    pub fn serialized_len(&self) -> usize {
        serde_json::to_string(self).map(|s| s.len()).unwrap_or(0)
    }
}
