use serde::{Deserialize, Serialize};

use crate::request::{AssistantMessage, ModelMessage};

/// The reason why a model reply has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFinishReason {
    /// The model needs to call a tool.
    ToolCalls,
    /// The model has finished generating text.
    Stop,
    /// The reply was cut off by the token limit.
    Length,
    /// The reply was filtered.
    ContentFilter,
}

/// Describes a tool call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The serialized arguments, exactly as the model produced them.
    ///
    /// They are usually a JSON object, but nothing guarantees it. Callers
    /// must parse and validate them.
    pub arguments: String,
}

/// A complete reply from the model: the single message of the first choice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelReply {
    /// Text content of the message, if any.
    pub content: Option<String>,
    /// Tool calls requested by the model, in the order they were issued.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
    /// The reason the model finished generating.
    #[serde(default)]
    pub finish_reason: Option<ModelFinishReason>,
}

impl ModelReply {
    /// Returns `true` if the model asked for at least one tool call.
    #[inline]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Converts this reply into the assistant message to be put back into the
    /// conversation. The tool calls are carried over verbatim.
    #[inline]
    pub fn into_message(self) -> ModelMessage {
        ModelMessage::Assistant(AssistantMessage {
            content: self.content.unwrap_or_default(),
            tool_calls: self.tool_calls,
        })
    }
}
