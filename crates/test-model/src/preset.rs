use ai_orchestrator_model::{ModelFinishReason, ModelReply, ToolCallRequest};
use serde::{Deserialize, Serialize};

/// The preset reply for one model call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// Text content of the reply.
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls in the reply.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
    /// If set, the request will fail in the first `failure` attempts.
    /// `Some(0)` means the request will fail infinitely.
    #[serde(default)]
    pub failures: Option<u64>,
}

impl PresetReply {
    /// Creates a plain-text `PresetReply`.
    #[inline]
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
            failures: None,
        }
    }

    /// Creates a `PresetReply` that requests the given tool calls.
    #[inline]
    pub fn tool_calls(calls: impl Into<Vec<ToolCallRequest>>) -> Self {
        Self {
            content: None,
            tool_calls: calls.into(),
            failures: None,
        }
    }

    /// Sets the text content that accompanies the reply.
    #[inline]
    pub fn with_content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets failure times before a successful reply. `0` means the reply
    /// will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }

    pub(crate) fn to_reply(&self) -> ModelReply {
        let finish_reason = if self.tool_calls.is_empty() {
            ModelFinishReason::Stop
        } else {
            ModelFinishReason::ToolCalls
        };
        ModelReply {
            content: self.content.clone(),
            tool_calls: self.tool_calls.clone(),
            finish_reason: Some(finish_reason),
        }
    }
}

/// Shorthand for building a [`ToolCallRequest`] in scripts.
#[inline]
pub fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_owned(),
        name: name.to_owned(),
        arguments: arguments.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let reply = PresetReply::tool_calls([tool_call(
            "1",
            "generate_image",
            r#"{"prompt":"a lighthouse"}"#,
        )])
        .with_content("Drawing it now.");

        let serialized = serde_json::to_string(&reply).unwrap();
        let deserialized: PresetReply =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(reply, deserialized);
    }

    #[test]
    fn test_finish_reason() {
        let reply = PresetReply::text("hi").to_reply();
        assert_eq!(reply.finish_reason, Some(ModelFinishReason::Stop));

        let reply =
            PresetReply::tool_calls([tool_call("1", "x", "{}")]).to_reply();
        assert_eq!(reply.finish_reason, Some(ModelFinishReason::ToolCalls));
    }
}
