//! Inventory lookup tool

use crate::models::InventoryItem;
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const NOT_FOUND_MESSAGE: &str = "No specific inventory found matching that request.";

pub struct CheckInventoryTool {
    definition: ToolDefinition,
}

impl CheckInventoryTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "item_query".to_string(),
            PropertySchema::string("Name (or part of the name) of the supply item to look up"),
        );

        CheckInventoryTool {
            definition: ToolDefinition {
                name: "check_inventory".to_string(),
                description: "Checks available relief supplies in the database.".to_string(),
                input_schema: ToolInputSchema::new(properties, &["item_query"]),
            },
        }
    }
}

impl Default for CheckInventoryTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct CheckInventoryParams {
    item_query: String,
}

/// Render matches as a markdown table.
fn format_inventory_table(items: &[InventoryItem]) -> String {
    let mut out = String::from("| item | quantity | location |\n|---|---|---|\n");
    for item in items {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            item.item, item.quantity, item.location
        ));
    }
    out.trim_end().to_string()
}

#[async_trait]
impl Tool for CheckInventoryTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: CheckInventoryParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let items = match context.db.search_inventory(&params.item_query) {
            Ok(items) => items,
            Err(e) => return ToolResult::error(format!("Inventory lookup failed: {}", e)),
        };

        if items.is_empty() {
            // Not an error: "nothing in stock" is a valid answer the
            // logistics responder builds on (e.g. by offering a web search).
            return ToolResult::success(NOT_FOUND_MESSAGE);
        }

        ToolResult::success(format_inventory_table(&items))
    }
}
