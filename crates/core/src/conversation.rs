//! Conversation-related types.

use ai_orchestrator_model::{ModelMessage, ToolCallResult};

/// An append-only transcript of a run.
///
/// Every model call resends the whole transcript. The loop only talks to the
/// model through [`Conversation::snapshot`], so the resend policy is decided
/// here and nowhere else.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    messages: Vec<ModelMessage>,
}

impl Conversation {
    /// Creates an empty conversation.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    #[inline]
    pub fn push(&mut self, msg: ModelMessage) {
        self.messages.push(msg);
    }

    /// Appends a finished tool round: the assistant message as received,
    /// followed by the tool results in processing order.
    pub fn append_round(
        &mut self,
        assistant: ModelMessage,
        results: Vec<ToolCallResult>,
    ) {
        self.messages.reserve(results.len() + 1);
        self.messages.push(assistant);
        self.messages
            .extend(results.into_iter().map(ModelMessage::Tool));
    }

    /// Returns all messages so far.
    #[inline]
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Returns the messages to send with the next model request.
    #[inline]
    pub fn snapshot(&self) -> Vec<ModelMessage> {
        self.messages.clone()
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the conversation has no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use ai_orchestrator_model::{AssistantMessage, ToolCallRequest};

    use super::*;

    #[test]
    fn test_append_round_order() {
        let mut conversation = Conversation::new();
        conversation.push(ModelMessage::system("sys"));
        conversation.push(ModelMessage::user("hi"));

        let assistant = ModelMessage::Assistant(AssistantMessage {
            content: String::new(),
            tool_calls: vec![ToolCallRequest {
                id: "a".to_owned(),
                name: "t".to_owned(),
                arguments: "{}".to_owned(),
            }],
        });
        conversation.append_round(
            assistant.clone(),
            vec![
                ToolCallResult {
                    id: "a".to_owned(),
                    name: "t".to_owned(),
                    content: "1".to_owned(),
                },
                ToolCallResult {
                    id: "b".to_owned(),
                    name: "t".to_owned(),
                    content: "2".to_owned(),
                },
            ],
        );

        let roles: Vec<_> =
            conversation.messages().iter().map(|m| m.role()).collect();
        assert_eq!(roles, ["system", "user", "assistant", "tool", "tool"]);
        assert_eq!(conversation.messages()[2], assistant);
        assert_eq!(conversation.snapshot(), conversation.messages());
    }
}
