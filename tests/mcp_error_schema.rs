use jsonschema::validator_for;
use serde_json::Value;

use pom_mcp_server::protocol::{McpErrorCode, McpErrorResponse};

#[test]
fn golden_mcp_error_schema_validation() {
    // 1. Build a canonical error response
    let response = McpErrorResponse::new(
        McpErrorCode::EntityNotFound,
        "Plugin 'org.apache.maven.plugins:maven-surefire-plugin' not found in profile 'it'",
    );

    let json_str = serde_json::to_string_pretty(&response).unwrap();
    let json_value: Value = serde_json::from_str(&json_str).unwrap();

    // 2. Schema (v0), frozen
    let schema_str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "$id": "https://pom-mcp-server.dev/schemas/mcp/error-v0.json",
  "title": "MCP Error Response v0",
  "type": "object",
  "required": ["error"],
  "additionalProperties": false,
  "properties": {
    "error": {
      "type": "object",
      "required": ["code", "message"],
      "additionalProperties": false,
      "properties": {
        "code": {
          "type": "string",
          "enum": [
            "profile_not_found",
            "entity_not_found",
            "already_exists",
            "invalid_arguments",
            "pom_invalid",
            "io_error",
            "internal_error"
          ]
        },
        "message": {
          "type": "string",
          "minLength": 1
        }
      }
    }
  }
}"#;

    let schema_json: Value = serde_json::from_str(schema_str).unwrap();
    let validator = validator_for(&schema_json).unwrap();

    // 3. Validate against schema
    assert!(validator.is_valid(&json_value), "MCP error JSON must satisfy v0 schema");

    // 4. Golden snapshot (byte-identical, stable)
    let expected = r#"{
  "error": {
    "code": "entity_not_found",
    "message": "Plugin 'org.apache.maven.plugins:maven-surefire-plugin' not found in profile 'it'"
  }
}"#;

    assert_eq!(json_str.trim(), expected.trim(), "MCP error JSON snapshot mismatch");
}

#[test]
fn pom_errors_map_to_codes() {
    use std::path::PathBuf;

    use pom_mcp_server::pom::{EntityKind, PomError, ProfileScope};

    let cases = [
        (PomError::ProfileNotFound("it".into()), "profile_not_found", -32602),
        (
            PomError::EntityNotFound {
                kind: EntityKind::ManagedDependency,
                key: "org.junit:junit-bom".into(),
                scope: ProfileScope::MainPom,
            },
            "entity_not_found",
            -32602,
        ),
        (
            PomError::AlreadyExists {
                kind: EntityKind::Property,
                key: "java.version".into(),
                scope: ProfileScope::Profile("it".into()),
            },
            "already_exists",
            -32602,
        ),
        (PomError::InvalidName("1st".into()), "invalid_arguments", -32602),
        (PomError::BlankIdentifier("artifact_id"), "invalid_arguments", -32602),
        (
            PomError::Read {
                path: PathBuf::from("/missing/pom.xml"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            "io_error",
            -32603,
        ),
    ];

    for (err, code, rpc_code) in cases {
        let message = err.to_string();
        let response = McpErrorResponse::from(err);
        let json: Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], code);
        assert_eq!(json["error"]["message"], message.as_str());
        assert_eq!(response.error.code.json_rpc_code(), rpc_code);
    }
}
