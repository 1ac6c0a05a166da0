use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RunwayError;

/// Caller-supplied parameter values, keyed by parameter name.
pub type ParameterMap = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// Identifiers
// =============================================================================

/// Identity of a persisted execution record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(pub Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExecutionId {
    type Err = RunwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| RunwayError::Serialization(format!("Invalid execution id {}: {}", s, e)))
    }
}

/// Reference to an action in `pack.name` form.
///
/// The pack is everything before the first `.`; the name may itself contain
/// dots. Both parts must be non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionRef {
    pub pack: String,
    pub name: String,
}

impl ActionRef {
    pub fn new(pack: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pack: pack.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.pack, self.name)
    }
}

impl FromStr for ActionRef {
    type Err = RunwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((pack, name)) if !pack.is_empty() && !name.is_empty() => {
                Ok(Self::new(pack, name))
            }
            _ => Err(RunwayError::InvalidReference(s.to_string())),
        }
    }
}

impl TryFrom<String> for ActionRef {
    type Error = RunwayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActionRef> for String {
    fn from(value: ActionRef) -> Self {
        value.to_string()
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle status of an execution record.
///
/// Admission only ever produces `Scheduled`; the remaining states belong to
/// the downstream dispatcher and runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Requested,
    Scheduled,
    Running,
    Succeeded,
    Failed,
    Canceled,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Requested => write!(f, "requested"),
            ExecutionStatus::Scheduled => write!(f, "scheduled"),
            ExecutionStatus::Running => write!(f, "running"),
            ExecutionStatus::Succeeded => write!(f, "succeeded"),
            ExecutionStatus::Failed => write!(f, "failed"),
            ExecutionStatus::Canceled => write!(f, "canceled"),
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(ExecutionStatus::Requested),
            "scheduled" => Ok(ExecutionStatus::Scheduled),
            "running" => Ok(ExecutionStatus::Running),
            "succeeded" => Ok(ExecutionStatus::Succeeded),
            "failed" => Ok(ExecutionStatus::Failed),
            "canceled" => Ok(ExecutionStatus::Canceled),
            _ => Err(format!("Unknown execution status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- ActionRef ----

    #[test]
    fn test_action_ref_parse() {
        let r: ActionRef = "core.local".parse().unwrap();
        assert_eq!(r.pack, "core");
        assert_eq!(r.name, "local");
        assert_eq!(r.to_string(), "core.local");
    }

    #[test]
    fn test_action_ref_name_keeps_inner_dots() {
        let r: ActionRef = "linux.file.touch".parse().unwrap();
        assert_eq!(r.pack, "linux");
        assert_eq!(r.name, "file.touch");
    }

    #[test]
    fn test_action_ref_rejects_malformed() {
        for bad in ["core", ".local", "core.", "", "."] {
            let err = bad.parse::<ActionRef>().unwrap_err();
            assert!(
                matches!(err, RunwayError::InvalidReference(_)),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_action_ref_serializes_as_string() {
        let r = ActionRef::new("core", "echo");
        assert_eq!(serde_json::to_string(&r).unwrap(), r#""core.echo""#);

        let parsed: ActionRef = serde_json::from_str(r#""core.echo""#).unwrap();
        assert_eq!(parsed, r);

        assert!(serde_json::from_str::<ActionRef>(r#""echo""#).is_err());
    }

    // ---- ExecutionId ----

    #[test]
    fn test_execution_id_display_and_parse() {
        let id: ExecutionId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert!("not-a-uuid".parse::<ExecutionId>().is_err());
    }

    #[test]
    fn test_execution_id_is_unique() {
        assert_ne!(ExecutionId::new(), ExecutionId::new());
    }

    // ---- ExecutionStatus ----

    #[test]
    fn test_execution_status_display_from_str() {
        for status in [
            ExecutionStatus::Requested,
            ExecutionStatus::Scheduled,
            ExecutionStatus::Running,
            ExecutionStatus::Succeeded,
            ExecutionStatus::Failed,
            ExecutionStatus::Canceled,
        ] {
            let text = status.to_string();
            assert_eq!(text.parse::<ExecutionStatus>().unwrap(), status);
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", text)
            );
        }
        assert!("complete".parse::<ExecutionStatus>().is_err());
    }
}
