use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;

use ai_orchestrator_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelReply, ModelRequest, ToolCallRequest, ToolChoice,
};

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message, or asks for a drawing when told to draw.
struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let result = 'blk: {
            let Some(last) = req.messages.last() else {
                break 'blk Err(FakeModelProviderError(ErrorKind::Other));
            };

            let content = match last {
                ModelMessage::User { content } => content.clone(),
                ModelMessage::Tool(result) => {
                    break 'blk Ok(ModelReply {
                        content: Some(format!("Here it is: {}", result.content)),
                        tool_calls: vec![],
                        finish_reason: Some(ModelFinishReason::Stop),
                    });
                }
                _ => unreachable!("unexpected message: {last:?}"),
            };

            if let Some(prompt) = content.strip_prefix("draw ") {
                if req.tool_choice == ToolChoice::None {
                    break 'blk Err(FakeModelProviderError(ErrorKind::Moderated));
                }
                break 'blk Ok(ModelReply {
                    content: None,
                    tool_calls: vec![ToolCallRequest {
                        id: "call_0".to_owned(),
                        name: "generate_image".to_owned(),
                        arguments: format!("{{\"prompt\":\"{prompt}\"}}"),
                    }],
                    finish_reason: Some(ModelFinishReason::ToolCalls),
                });
            }

            Ok(ModelReply {
                content: Some(format!("You said {content}")),
                tool_calls: vec![],
                finish_reason: Some(ModelFinishReason::Stop),
            })
        };
        ready(result)
    }
}

#[tokio::test]
async fn test_completion() {
    let provider = FakeModelProvider;
    let req = ModelRequest {
        messages: vec![ModelMessage::user("Good morning")],
        tools: vec![],
        tool_choice: ToolChoice::Auto,
    };
    let reply = provider.send_request(&req).await.unwrap();
    assert!(!reply.has_tool_calls());
    assert_eq!(reply.content.as_deref(), Some("You said Good morning"));
}

#[tokio::test]
async fn test_tool_call_round() {
    let provider = FakeModelProvider;
    let mut req = ModelRequest {
        messages: vec![ModelMessage::user("draw a cat")],
        tools: vec![],
        tool_choice: ToolChoice::Auto,
    };
    let reply = provider.send_request(&req).await.unwrap();
    assert_eq!(reply.tool_calls.len(), 1);
    assert_eq!(reply.tool_calls[0].arguments, r#"{"prompt":"a cat"}"#);

    let id = reply.tool_calls[0].id.clone();
    req.messages.push(reply.into_message());
    req.messages
        .push(ModelMessage::Tool(ai_orchestrator_model::ToolCallResult {
            id,
            name: "generate_image".to_owned(),
            content: "<img src=\"cat.png\">".to_owned(),
        }));
    let reply = provider.send_request(&req).await.unwrap();
    assert_eq!(
        reply.content.as_deref(),
        Some("Here it is: <img src=\"cat.png\">")
    );
}

#[tokio::test]
async fn test_error() {
    let provider = FakeModelProvider;
    let req = ModelRequest {
        messages: vec![],
        tools: vec![],
        tool_choice: ToolChoice::Auto,
    };
    let err = provider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
}
