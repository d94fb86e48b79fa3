//! Incident logging tool

use crate::models::Severity;
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Persists one incident row per call. Never deduplicates: two identical
/// reports are two incidents.
pub struct LogIncidentTool {
    definition: ToolDefinition,
}

impl LogIncidentTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "severity".to_string(),
            PropertySchema::string_enum("How severe the incident is", &Severity::labels()),
        );
        properties.insert(
            "location".to_string(),
            PropertySchema::string("Where the incident is happening"),
        );
        properties.insert(
            "needs".to_string(),
            PropertySchema::string("What kind of help is needed (e.g. Medical, Rescue)"),
        );

        LogIncidentTool {
            definition: ToolDefinition {
                name: "log_incident".to_string(),
                description:
                    "Logs a new incident into the central database. Use this when a user reports an emergency."
                        .to_string(),
                input_schema: ToolInputSchema::new(properties, &["severity", "location", "needs"]),
            },
        }
    }
}

impl Default for LogIncidentTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct LogIncidentParams {
    severity: String,
    location: String,
    needs: String,
}

#[async_trait]
impl Tool for LogIncidentTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: LogIncidentParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        // The model picks the severity; parse against the vocabulary and
        // store the canonical casing.
        let severity = match Severity::from_str(&params.severity) {
            Some(s) => s,
            None => {
                return ToolResult::error(format!(
                    "Invalid severity '{}'. Expected one of: {}.",
                    params.severity,
                    Severity::labels().join(", ")
                ))
            }
        };

        match context
            .db
            .insert_incident(severity.as_str(), &params.location, &params.needs)
        {
            Ok(id) => ToolResult::success(format!(
                "Incident logged successfully. ID: {}. Dispatching protocols initiated.",
                id
            )),
            Err(e) => ToolResult::error(format!("Failed to log incident: {}", e)),
        }
    }
}
