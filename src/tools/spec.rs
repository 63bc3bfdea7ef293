// ABOUTME: Tool descriptor in the function-calling shape shared by Arcade and the chat model.
// ABOUTME: Serializes as {"type":"function","function":{name, description, parameters}}.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool the model may call, as described by the provisioning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionSpec,
}

/// Name, description, and JSON-schema parameters of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "empty_object_schema")]
    pub parameters: Value,
}

fn function_kind() -> String {
    "function".to_string()
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            kind: function_kind(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formatted_tool() {
        let json = r#"{
            "type": "function",
            "function": {
                "name": "GoogleCalendar_ListEvents",
                "description": "List events in a date range",
                "parameters": {
                    "type": "object",
                    "properties": {"min_end_datetime": {"type": "string"}},
                    "required": ["min_end_datetime"]
                }
            }
        }"#;
        let spec: ToolSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.name(), "GoogleCalendar_ListEvents");
        assert_eq!(spec.kind, "function");
        assert_eq!(spec.function.parameters["required"][0], "min_end_datetime");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let spec: ToolSpec =
            serde_json::from_str(r#"{"function": {"name": "GoogleCalendar_WhoAmI"}}"#).unwrap();
        assert_eq!(spec.kind, "function");
        assert!(spec.function.description.is_empty());
        assert_eq!(spec.function.parameters["type"], "object");
    }

    #[test]
    fn serializes_type_field() {
        let spec = ToolSpec::new("WhoAmI", "Who am I", serde_json::json!({"type": "object"}));
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "WhoAmI");
    }
}
