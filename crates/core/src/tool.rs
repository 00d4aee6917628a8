//! Tool call supports.

mod error;
mod registry;

use std::any::Any;
use std::future::ready;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;

use ai_orchestrator_model::{ModelTool, ToolCallRequest, ToolCallResult};
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::{Error, ErrorKind};
pub use registry::{RegistryError, ToolRegistry};

use crate::ToolExecutionError;

/// The result of a tool call.
pub type ToolResult = Result<String, Error>;

/// A boxed future that resolves to the result message of a tool call.
pub type HandleFuture = Pin<
    Box<dyn Future<Output = Result<ToolCallResult, ToolExecutionError>> + Send>,
>;

/// A tool that can be called by the model.
///
/// Implementations of this trait should be stateless. The same instance may
/// serve several runs, so anything the tool needs (API clients, storage)
/// should be cheap to clone into the future returned by [`Tool::execute`].
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the tool.
    fn parameter_schema(&self) -> &Value;

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    /// The returned string becomes the content of the tool message.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}

/// A type-erased tool, as stored in a [`ToolRegistry`].
///
/// Every [`Tool`] gets this for free when registered. Implement it directly
/// only when the input cannot be described by a single Rust type.
pub trait ToolObject: Send + Sync + 'static {
    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the definition sent to the model. Must be pure.
    fn definition(&self) -> ModelTool;

    /// Handles a call with already parsed arguments.
    fn handle(&self, call: &ToolCallRequest, arguments: Value) -> HandleFuture;
}

pub(crate) struct AnyTool<T: Tool>(pub T);

impl<T: Tool> ToolObject for AnyTool<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    fn definition(&self) -> ModelTool {
        ModelTool {
            name: self.0.name().to_owned(),
            description: self.0.description().to_owned(),
            parameters: self.0.parameter_schema().clone(),
        }
    }

    fn handle(&self, call: &ToolCallRequest, arguments: Value) -> HandleFuture {
        let id = call.id.clone();
        let name = self.0.name().to_owned();

        let input: T::Input = match serde_json::from_value(arguments) {
            Ok(input) => input,
            Err(err) => {
                return Box::pin(ready(Err(ToolExecutionError::unexpected(
                    name, err,
                ))));
            }
        };

        let fut = match panic::catch_unwind(AssertUnwindSafe(|| {
            self.0.execute(input)
        })) {
            Ok(fut) => fut,
            Err(payload) => {
                return Box::pin(ready(Err(ToolExecutionError::unexpected(
                    name,
                    panic_message(payload),
                ))));
            }
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(content)) => Ok(ToolCallResult { id, name, content }),
                Ok(Err(err)) => Err(ToolExecutionError::declared(name, err)),
                Err(payload) => Err(ToolExecutionError::unexpected(
                    name,
                    panic_message(payload),
                )),
            }
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_owned()
    };
    format!("tool panicked: {detail}")
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::ToolFailureKind;

    #[derive(Deserialize)]
    struct PromptInput {
        prompt: String,
    }

    struct PromptTool {
        schema: Value,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Tool for PromptTool {
        type Input = PromptInput;

        fn name(&self) -> &str {
            "prompt_tool"
        }

        fn description(&self) -> &str {
            "Echoes the prompt."
        }

        fn parameter_schema(&self) -> &Value {
            &self.schema
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            self.seen.lock().unwrap().push(input.prompt.clone());
            async move {
                match input.prompt.as_str() {
                    "" => Err(Error::invalid_input().with_reason("empty")),
                    "panic" => panic!("bad prompt"),
                    prompt => Ok(format!("<{prompt}>")),
                }
            }
        }
    }

    fn tool() -> AnyTool<PromptTool> {
        AnyTool(PromptTool {
            schema: json!({
                "type": "object",
                "properties": { "prompt": { "type": "string" } },
                "required": ["prompt"]
            }),
            seen: Default::default(),
        })
    }

    fn call(arguments: &str) -> ToolCallRequest {
        ToolCallRequest {
            id: "call_1".to_owned(),
            name: "prompt_tool".to_owned(),
            arguments: arguments.to_owned(),
        }
    }

    #[test]
    fn test_definition_is_stable() {
        let tool = tool();
        let first = tool.definition();
        assert_eq!(first, tool.definition());
        assert_eq!(first.name, "prompt_tool");
        assert_eq!(first.parameters["required"], json!(["prompt"]));
    }

    #[tokio::test]
    async fn test_handle() {
        let tool = tool();
        let result = tool
            .handle(&call("{}"), json!({ "prompt": "a cat" }))
            .await
            .unwrap();
        assert_eq!(result.id, "call_1");
        assert_eq!(result.name, "prompt_tool");
        assert_eq!(result.content, "<a cat>");
        assert_eq!(*tool.0.seen.lock().unwrap(), ["a cat"]);
    }

    #[tokio::test]
    async fn test_failures() {
        let tool = tool();

        let err = tool
            .handle(&call("{}"), json!({ "prompt": "" }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ToolFailureKind::Declared);
        assert_eq!(err.declared_error().unwrap().reason(), "empty");

        let err = tool
            .handle(&call("{}"), json!({ "prompt": 42 }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ToolFailureKind::Unexpected);

        let err = tool
            .handle(&call("{}"), json!({ "prompt": "panic" }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ToolFailureKind::Unexpected);
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "tool panicked: bad prompt"
        );
    }
}
