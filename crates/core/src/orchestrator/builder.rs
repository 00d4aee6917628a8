use std::sync::Arc;

use ai_orchestrator_model::ModelProvider;

use super::Orchestrator;
use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::tool::{AnyTool, RegistryError, Tool, ToolObject, ToolRegistry};

/// Maximum number of tool rounds in a run unless configured otherwise.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 16;

/// [`Orchestrator`] builder.
pub struct OrchestratorBuilder {
    model_client: ModelClient,
    tools: Vec<Box<dyn ToolObject>>,
    max_tool_rounds: usize,
}

impl OrchestratorBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            tools: vec![],
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(self, tool: T) -> Self {
        self.with_tool_object(Box::new(AnyTool(tool)))
    }

    /// Registers a type-erased tool.
    #[inline]
    pub fn with_tool_object(mut self, tool: Box<dyn ToolObject>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Sets how many tool rounds a run may take before it fails.
    #[inline]
    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    /// Builds the orchestrator.
    ///
    /// Fails if two tools share a name.
    pub fn build(self) -> Result<Orchestrator, RegistryError> {
        let mut registry = ToolRegistry::new();
        for tool in self.tools {
            registry.register_object(tool)?;
        }
        Ok(Orchestrator {
            model_client: self.model_client,
            registry: Arc::new(registry),
            seed: Conversation::new(),
            max_tool_rounds: self.max_tool_rounds,
        })
    }
}
