use crate::CatalogError;
use rolegate_domain::model::{Capability, Role, RoleCatalog, StatementLimits};
use rolegate_types::{ConditionMap, Effect};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Wire format of a role specification file.
///
/// Fields are permissive Options so that a missing required field becomes a
/// `MalformedRole` with a named reason instead of an opaque serde error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoleCatalogV1 {
    #[serde(default)]
    pub schema: Option<String>,
    pub roles: Vec<RoleRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoleRecord {
    #[serde(default)]
    pub name: Option<String>,
    /// Must be explicit; a role that omits it is malformed. The canonical
    /// spelling is `requiresMFA`; the all-camel form is accepted too.
    #[serde(default, rename = "requiresMFA", alias = "requiresMfa")]
    pub requires_mfa: Option<bool>,
    #[serde(default)]
    pub capabilities: Vec<CapabilityRecord>,
    #[serde(default)]
    pub resource_prefix: Option<String>,
    #[serde(default)]
    pub superset_of: Vec<String>,
    #[serde(default)]
    pub max_statements: Option<usize>,
    #[serde(default)]
    pub max_actions_per_statement: Option<usize>,
    #[serde(default)]
    pub max_resources_per_statement: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CapabilityRecord {
    pub effect: EffectRecord,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub conditions: ConditionMap,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectRecord {
    Allow,
    Deny,
}

impl From<EffectRecord> for Effect {
    fn from(e: EffectRecord) -> Self {
        match e {
            EffectRecord::Allow => Effect::Allow,
            EffectRecord::Deny => Effect::Deny,
        }
    }
}

/// Parse a role specification document into the domain catalogue.
///
/// Structural problems (bad JSON) surface as `Parse`; semantic problems
/// (missing fields, duplicate names) surface as `MalformedRole` or
/// `DuplicateRole` naming the offending role.
pub fn parse_catalog(text: &str) -> Result<RoleCatalog, CatalogError> {
    let raw: RoleCatalogV1 = serde_json::from_str(text)?;

    let mut roles: BTreeMap<String, Role> = BTreeMap::new();
    for record in raw.roles {
        let role = validate_record(record)?;
        if roles.contains_key(&role.name) {
            return Err(CatalogError::DuplicateRole { role: role.name });
        }
        roles.insert(role.name.clone(), role);
    }
    Ok(RoleCatalog { roles })
}

fn validate_record(record: RoleRecord) -> Result<Role, CatalogError> {
    let name = match record.name {
        Some(name) if !name.trim().is_empty() => name,
        Some(_) => {
            return Err(CatalogError::MalformedRole {
                role: "<unnamed>".to_string(),
                reason: "role name is empty".to_string(),
            });
        }
        None => {
            return Err(CatalogError::MalformedRole {
                role: "<unnamed>".to_string(),
                reason: "role name is missing".to_string(),
            });
        }
    };

    let Some(requires_mfa) = record.requires_mfa else {
        return Err(CatalogError::MalformedRole {
            role: name,
            reason: "requiresMFA must be set explicitly".to_string(),
        });
    };

    let mut capabilities = Vec::with_capacity(record.capabilities.len());
    for (idx, cap) in record.capabilities.into_iter().enumerate() {
        if cap.actions.is_empty() {
            return Err(CatalogError::MalformedRole {
                role: name,
                reason: format!("capability {idx} lists no actions"),
            });
        }
        if cap.resources.is_empty() {
            return Err(CatalogError::MalformedRole {
                role: name,
                reason: format!("capability {idx} lists no resources"),
            });
        }
        if cap.actions.iter().any(|a| a.trim().is_empty()) {
            return Err(CatalogError::MalformedRole {
                role: name,
                reason: format!("capability {idx} contains an empty action pattern"),
            });
        }
        if cap.resources.iter().any(|r| r.trim().is_empty()) {
            return Err(CatalogError::MalformedRole {
                role: name,
                reason: format!("capability {idx} contains an empty resource pattern"),
            });
        }
        capabilities.push(Capability {
            effect: cap.effect.into(),
            actions: cap.actions,
            resources: cap.resources,
            conditions: cap.conditions,
        });
    }

    let defaults = StatementLimits::default();
    let limits = StatementLimits {
        max_statements: record.max_statements.unwrap_or(defaults.max_statements),
        max_actions_per_statement: record
            .max_actions_per_statement
            .unwrap_or(defaults.max_actions_per_statement),
        max_resources_per_statement: record
            .max_resources_per_statement
            .unwrap_or(defaults.max_resources_per_statement),
    };

    Ok(Role {
        name,
        requires_mfa,
        capabilities,
        resource_prefix: record.resource_prefix,
        superset_of: record.superset_of.into_iter().collect(),
        limits,
    })
}
