//! Parameter validation against the merged action + runner schema.

use serde_json::{json, Map, Value};
use tracing::debug;

use runway_core::{ActionDefinition, ParameterDecl, ParameterMap, RunnerTypeDefinition};

use crate::error::{AdmissionError, ParameterViolation};

fn property_schema(decl: &ParameterDecl) -> Value {
    let mut property = decl.keywords.clone();
    if let Some(default) = &decl.default {
        property.insert("default".to_string(), default.clone());
    }
    Value::Object(property)
}

/// Build the JSON Schema a request's parameters must satisfy.
///
/// Runner parameters are laid down first and action parameters override
/// them by name. A parameter is required only if its winning declaration
/// says so and carries no default. Undeclared parameters are rejected.
pub fn parameter_schema(action: &ActionDefinition, runner: &RunnerTypeDefinition) -> Value {
    let mut declared: Vec<(&String, &ParameterDecl)> = runner.runner_parameters.iter().collect();
    declared.retain(|(name, _)| !action.parameters.contains_key(*name));
    declared.extend(action.parameters.iter());

    let mut properties = Map::new();
    let mut required = Vec::new();
    for (name, decl) in declared {
        properties.insert(name.clone(), property_schema(decl));
        if decl.required && decl.default.is_none() {
            required.push(Value::String(name.clone()));
        }
    }
    required.sort_by(|a, b| a.as_str().cmp(&b.as_str()));

    let mut schema = json!({
        "title": action.name,
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    });
    if let Some(description) = &action.description {
        schema["description"] = Value::String(description.clone());
    }
    schema
}

/// Validate `parameters` against the merged schema, collecting every
/// violation. Values are not modified and no defaults are filled in.
pub fn validate_parameters(
    action: &ActionDefinition,
    runner: &RunnerTypeDefinition,
    parameters: &ParameterMap,
) -> Result<(), AdmissionError> {
    let schema = parameter_schema(action, runner);
    let validator = jsonschema::options()
        .should_validate_formats(true)
        .build(&schema)
        .map_err(|e| AdmissionError::InvalidParameterSchema {
            action: action.reference(),
            message: e.to_string(),
        })?;

    let instance = Value::Object(parameters.clone());
    let violations: Vec<ParameterViolation> = validator
        .iter_errors(&instance)
        .map(|e| ParameterViolation {
            path: e.instance_path().to_string(),
            schema_path: e.schema_path().to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        debug!(action = %action.reference(), count = parameters.len(), "Parameters valid");
        Ok(())
    } else {
        Err(AdmissionError::ParameterValidation {
            action: action.reference(),
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_runner() -> RunnerTypeDefinition {
        RunnerTypeDefinition::new("run-local")
            .with_parameter("cmd", ParameterDecl::typed("string").required())
            .with_parameter("timeout", ParameterDecl::typed("integer").with_default(json!(60)))
            .with_parameter(
                "sudo",
                ParameterDecl::typed("boolean")
                    .immutable()
                    .with_default(json!(false)),
            )
    }

    fn params(value: Value) -> ParameterMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    fn violations_of(err: AdmissionError) -> Vec<ParameterViolation> {
        match err {
            AdmissionError::ParameterValidation { violations, .. } => violations,
            other => panic!("Expected ParameterValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_merges_runner_and_action() {
        let action = ActionDefinition::new("core", "local", "run-local")
            .with_parameter("env", ParameterDecl::typed("object"));
        let schema = parameter_schema(&action, &local_runner());

        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["title"], json!("local"));
        assert_eq!(schema["additionalProperties"], json!(false));
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 4);
        assert_eq!(properties["timeout"], json!({"type": "integer", "default": 60}));
        assert_eq!(schema["required"], json!(["cmd"]));
    }

    #[test]
    fn test_action_declaration_wins_on_collision() {
        let action = ActionDefinition::new("core", "local", "run-local").with_parameter(
            "cmd",
            ParameterDecl::typed("string").with_default(json!("uname -a")),
        );
        let schema = parameter_schema(&action, &local_runner());

        assert_eq!(
            schema["properties"]["cmd"],
            json!({"type": "string", "default": "uname -a"})
        );
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_null_default_not_required() {
        let decl: ParameterDecl = serde_json::from_value(json!({
            "type": ["string", "null"],
            "required": true,
            "default": null
        }))
        .unwrap();
        let action = ActionDefinition::new("core", "local", "run-local").with_parameter("p", decl);
        let runner = RunnerTypeDefinition::new("run-local");

        let schema = parameter_schema(&action, &runner);
        assert_eq!(schema["required"], json!([]));
        assert_eq!(schema["properties"]["p"]["default"], Value::Null);
        assert!(validate_parameters(&action, &runner, &ParameterMap::new()).is_ok());
    }

    #[test]
    fn test_runway_flags_not_in_schema() {
        let schema = parameter_schema(
            &ActionDefinition::new("core", "local", "run-local"),
            &local_runner(),
        );
        let sudo = schema["properties"]["sudo"].as_object().unwrap();
        assert!(!sudo.contains_key("immutable"));
        assert!(!sudo.contains_key("required"));
    }

    #[test]
    fn test_valid_parameters_pass() {
        let action = ActionDefinition::new("core", "local", "run-local");
        let result = validate_parameters(
            &action,
            &local_runner(),
            &params(json!({"cmd": "ls", "timeout": 5})),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_required_parameter() {
        let action = ActionDefinition::new("core", "local", "run-local");
        let err = validate_parameters(&action, &local_runner(), &ParameterMap::new()).unwrap_err();

        let violations = violations_of(err);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "");
        assert!(violations[0].message.contains("cmd"));
        assert!(violations[0].schema_path.ends_with("required"));
    }

    #[test]
    fn test_wrong_type_reports_path() {
        let action = ActionDefinition::new("core", "local", "run-local");
        let err = validate_parameters(
            &action,
            &local_runner(),
            &params(json!({"cmd": "ls", "timeout": "soon"})),
        )
        .unwrap_err();

        let violations = violations_of(err);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "/timeout");
        assert!(violations[0].message.contains("integer"));
    }

    #[test]
    fn test_all_violations_reported() {
        let action = ActionDefinition::new("core", "local", "run-local");
        let err = validate_parameters(
            &action,
            &local_runner(),
            &params(json!({"timeout": "soon", "sudo": "yes"})),
        )
        .unwrap_err();

        let violations = violations_of(err);
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_undeclared_parameter_rejected() {
        let action = ActionDefinition::new("core", "local", "run-local");
        let err = validate_parameters(
            &action,
            &local_runner(),
            &params(json!({"cmd": "ls", "colour": "red"})),
        )
        .unwrap_err();

        let violations = violations_of(err);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("colour"));
    }

    #[test]
    fn test_enum_constraint() {
        let action = ActionDefinition::new("core", "http", "run-local").with_parameter(
            "method",
            ParameterDecl::typed("string").with_keyword("enum", json!(["GET", "POST"])),
        );
        let runner = RunnerTypeDefinition::new("run-local");

        assert!(validate_parameters(&action, &runner, &params(json!({"method": "GET"}))).is_ok());
        assert!(
            validate_parameters(&action, &runner, &params(json!({"method": "PATCH"}))).is_err()
        );
    }

    #[test]
    fn test_format_constraint() {
        let action = ActionDefinition::new("core", "sendmail", "run-local").with_parameter(
            "to",
            ParameterDecl::typed("string").with_keyword("format", json!("email")),
        );
        let runner = RunnerTypeDefinition::new("run-local");

        assert!(
            validate_parameters(&action, &runner, &params(json!({"to": "ops@example.com"})))
                .is_ok()
        );
        assert!(
            validate_parameters(&action, &runner, &params(json!({"to": "not an address"})))
                .is_err()
        );
    }

    #[test]
    fn test_untyped_declaration_accepts_anything() {
        let action = ActionDefinition::new("core", "noop", "run-local")
            .with_parameter("payload", ParameterDecl::default());
        let runner = RunnerTypeDefinition::new("run-local");

        for value in [json!(1), json!("x"), json!({"a": [1, 2]}), json!(null)] {
            let result =
                validate_parameters(&action, &runner, &params(json!({ "payload": value })));
            assert!(result.is_ok());
        }
    }

    #[test]
    fn test_invalid_declaration_is_schema_error() {
        let action = ActionDefinition::new("core", "broken", "run-local")
            .with_parameter("count", ParameterDecl::typed("number-ish"));
        let runner = RunnerTypeDefinition::new("run-local");

        let err = validate_parameters(&action, &runner, &ParameterMap::new()).unwrap_err();
        assert!(matches!(err, AdmissionError::InvalidParameterSchema { .. }));
    }
}
