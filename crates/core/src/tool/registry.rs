use std::collections::HashMap;

use ai_orchestrator_model::ModelTool;
use thiserror::Error;

use super::{AnyTool, Tool, ToolObject};

/// Error returned when registering tools.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A tool with the same name is already registered.
    #[error("duplicate tool: {0}")]
    DuplicateTool(String),
}

/// The set of tools available to the model, keyed by name.
///
/// Definitions are reported in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn ToolObject>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    #[inline]
    pub fn register<T: Tool>(&mut self, tool: T) -> Result<(), RegistryError> {
        self.register_object(Box::new(AnyTool(tool)))
    }

    /// Registers a type-erased tool.
    pub fn register_object(
        &mut self,
        tool: Box<dyn ToolObject>,
    ) -> Result<(), RegistryError> {
        let name = tool.name().to_owned();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        trace!("registered tool: {name}");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Finds a tool by name.
    #[inline]
    pub fn find(&self, name: &str) -> Option<&dyn ToolObject> {
        self.index.get(name).map(|&idx| self.tools[idx].as_ref())
    }

    /// Returns the definitions of all tools.
    #[inline]
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde_json::{Value, json};

    use super::*;
    use crate::tool::ToolResult;

    struct NamedTool {
        name: &'static str,
        schema: Value,
    }

    impl NamedTool {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                schema: json!({ "type": "object" }),
            }
        }
    }

    impl Tool for NamedTool {
        type Input = Value;

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "A test tool"
        }

        fn parameter_schema(&self) -> &Value {
            &self.schema
        }

        fn execute(
            &self,
            _input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok("success".to_owned()))
        }
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = ToolRegistry::new();
        registry.register(NamedTool::new("b_tool")).unwrap();
        registry.register(NamedTool::new("a_tool")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.find("a_tool").is_some());
        assert!(registry.find("read_tool").is_none());

        let names: Vec<_> = registry
            .definitions()
            .into_iter()
            .map(|def| def.name)
            .collect();
        assert_eq!(names, ["b_tool", "a_tool"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(NamedTool::new("generate_image")).unwrap();
        let err = registry
            .register(NamedTool::new("generate_image"))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("generate_image".into()));
        assert_eq!(err.to_string(), "duplicate tool: generate_image");
        assert_eq!(registry.len(), 1);
    }
}
