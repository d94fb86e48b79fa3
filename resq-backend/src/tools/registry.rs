//! Tool trait and registry

use crate::tools::types::{ToolContext, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A named, independently invocable action with a typed input schema.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult;
}

/// Registry of available tools, keyed by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        self.tools.insert(name, tool);
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for a named subset, in the order requested. Unknown names
    /// are skipped with a warning.
    pub fn definitions_for(&self, names: &[&str]) -> Vec<ToolDefinition> {
        names
            .iter()
            .filter_map(|name| match self.tools.get(*name) {
                Some(tool) => Some(tool.definition()),
                None => {
                    log::warn!("[TOOL] No registered tool named '{}'", name);
                    None
                }
            })
            .collect()
    }

    /// Execute a tool by name. An unknown name is an error result, not a
    /// panic: the model controls the name, so it is untrusted input.
    pub async fn execute(&self, name: &str, params: Value, context: &ToolContext) -> ToolResult {
        let tool = match self.tools.get(name) {
            Some(t) => t,
            None => {
                log::warn!("[TOOL] Attempted to execute unknown tool '{}'", name);
                return ToolResult::error(format!("Unknown tool: {}", name));
            }
        };

        log::info!("[TOOL] Executing '{}' with params: {}", name, params);
        let result = tool.execute(params, context).await;
        log::info!("[TOOL] '{}' finished, success: {}", name, result.success);
        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
