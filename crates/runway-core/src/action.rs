//! Action and runner type definitions, and the catalog contract that
//! resolves them.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::types::ActionRef;

/// Declaration of a single parameter on an action or runner type.
///
/// `immutable`, `required`, and `default` are interpreted by Runway. Every
/// other key is a JSON Schema keyword (`type`, `enum`, `format`, ...) and is
/// carried into the merged parameter schema untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub immutable: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// `Some(Value::Null)` is an explicit null default, distinct from none.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    #[serde(flatten)]
    pub keywords: serde_json::Map<String, Value>,
}

fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ParameterDecl {
    /// Declaration constrained to a single JSON type.
    pub fn typed(json_type: &str) -> Self {
        let mut keywords = serde_json::Map::new();
        keywords.insert("type".to_string(), Value::String(json_type.to_string()));
        Self {
            keywords,
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_keyword(mut self, key: &str, value: Value) -> Self {
        self.keywords.insert(key.to_string(), value);
        self
    }
}

/// Parameter declarations keyed by name.
pub type ParameterDecls = BTreeMap<String, ParameterDecl>;

fn enabled_by_default() -> bool {
    true
}

/// A registered action. Read-only from the admission pipeline's view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub pack: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Name of the runner type this action delegates to.
    pub runner_type: String,
    #[serde(default)]
    pub parameters: ParameterDecls,
}

impl ActionDefinition {
    pub fn new(pack: &str, name: &str, runner_type: &str) -> Self {
        Self {
            pack: pack.to_string(),
            name: name.to_string(),
            description: None,
            enabled: true,
            runner_type: runner_type.to_string(),
            parameters: ParameterDecls::new(),
        }
    }

    pub fn reference(&self) -> ActionRef {
        ActionRef::new(self.pack.clone(), self.name.clone())
    }

    pub fn with_parameter(mut self, name: &str, decl: ParameterDecl) -> Self {
        self.parameters.insert(name.to_string(), decl);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A registered runner type. Its parameters sit underneath the action's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerTypeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub runner_parameters: ParameterDecls,
}

impl RunnerTypeDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            runner_parameters: ParameterDecls::new(),
        }
    }

    pub fn with_parameter(mut self, name: &str, decl: ParameterDecl) -> Self {
        self.runner_parameters.insert(name.to_string(), decl);
        self
    }
}

/// Read-only registry of actions and runner types.
///
/// `Ok(None)` means "no such definition"; `Err` is reserved for the
/// registry itself failing.
#[async_trait]
pub trait ActionCatalog: Send + Sync {
    async fn resolve_action(&self, reference: &ActionRef) -> Result<Option<ActionDefinition>>;

    async fn resolve_runner_type(&self, name: &str) -> Result<Option<RunnerTypeDefinition>>;
}
