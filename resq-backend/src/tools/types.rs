//! Tool schema and result types

use crate::db::Database;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// JSON Schema property definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        PropertySchema {
            schema_type: "string".to_string(),
            description: description.into(),
            enum_values: None,
        }
    }

    pub fn string_enum(description: impl Into<String>, values: &[&str]) -> Self {
        PropertySchema {
            schema_type: "string".to_string(),
            description: description.into(),
            enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
        }
    }
}

/// Tool input schema using JSON Schema format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: HashMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl ToolInputSchema {
    pub fn new(properties: HashMap<String, PropertySchema>, required: &[&str]) -> Self {
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties,
            required: required.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Render as the `parameters` object of an OpenAI-style function tool.
    pub fn to_json(&self) -> Value {
        json!({
            "type": self.schema_type,
            "properties": self.properties.iter().map(|(k, v)| {
                let mut prop = json!({
                    "type": v.schema_type,
                    "description": v.description,
                });
                if let Some(ref values) = v.enum_values {
                    prop["enum"] = json!(values);
                }
                (k.clone(), prop)
            }).collect::<serde_json::Map<String, Value>>(),
            "required": self.required,
        })
    }
}

/// Tool definition that gets sent to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
}

/// Result of tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        ToolResult {
            success: true,
            content: content.into(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        ToolResult {
            success: false,
            content: msg.clone(),
            error: Some(msg),
        }
    }
}

/// Context provided to tools during execution
#[derive(Clone)]
pub struct ToolContext {
    pub db: Arc<Database>,
}

impl ToolContext {
    pub fn new(db: Arc<Database>) -> Self {
        ToolContext { db }
    }
}
