//! Tool records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-schema style parameter description for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    /// Schema type; always "object"
    #[serde(rename = "type", default = "object_kind")]
    pub kind: String,
    /// Parameter name -> schema
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Names of required parameters
    #[serde(default)]
    pub required: Vec<String>,
}

fn object_kind() -> String {
    "object".to_string()
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            kind: object_kind(),
            properties: Map::new(),
            required: Vec::new(),
        }
    }
}

/// A tool an agent can call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name, unique on the server
    pub name: String,
    /// What the tool does
    #[serde(default)]
    pub description: String,
    /// Parameter schema
    #[serde(default)]
    pub parameters: ToolParameters,
}

impl Tool {
    /// Create a tool with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameters::default(),
        }
    }

    /// Add a parameter with the given JSON schema
    pub fn with_parameter(mut self, name: impl Into<String>, schema: Value, required: bool) -> Self {
        let name = name.into();
        if required {
            self.parameters.required.push(name.clone());
        }
        self.parameters.properties.insert(name, schema);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_serialization() {
        let tool = Tool::new("lookup_order", "Find an order by id")
            .with_parameter("order_id", json!({"type": "string"}), true)
            .with_parameter("verbose", json!({"type": "boolean"}), false);

        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["parameters"]["type"], "object");
        assert_eq!(value["parameters"]["required"], json!(["order_id"]));
        assert_eq!(value["parameters"]["properties"]["verbose"]["type"], "boolean");
    }
}
