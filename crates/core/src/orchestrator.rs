mod builder;

use std::sync::Arc;

use ai_orchestrator_model::{
    ModelMessage, ModelRequest, ModelTool, ToolCallRequest, ToolCallResult,
    ToolChoice,
};
use serde_json::Value;
use tracing::Instrument;

use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::tool::ToolRegistry;
use crate::{
    OrchestrationError, ResponseEnvelope, ToolArgumentError, TurnError,
};
pub use builder::{DEFAULT_MAX_TOOL_ROUNDS, OrchestratorBuilder};

/// Drives a model through tool-calling rounds until it produces a final
/// text reply.
///
/// The orchestrator holds the seed messages and the tool registry. Each call
/// to [`Orchestrator::run`] works on its own copy of the seed, so the same
/// orchestrator can be run several times. Cloning is cheap, the registry is
/// shared.
///
/// Everything within a run is sequential: one model call or one tool call is
/// in flight at a time, and tool calls of a round are handled in the order
/// the model issued them.
#[derive(Clone)]
pub struct Orchestrator {
    model_client: ModelClient,
    registry: Arc<ToolRegistry>,
    seed: Conversation,
    max_tool_rounds: usize,
}

impl Orchestrator {
    /// Appends a system message to the seed conversation.
    #[inline]
    pub fn add_system_message<S: Into<String>>(
        &mut self,
        text: S,
    ) -> &mut Self {
        self.seed.push(ModelMessage::system(text));
        self
    }

    /// Appends a user message to the seed conversation.
    #[inline]
    pub fn add_init_chat_message<S: Into<String>>(
        &mut self,
        text: S,
    ) -> &mut Self {
        self.seed.push(ModelMessage::user(text));
        self
    }

    /// Returns the seed conversation.
    #[inline]
    pub fn seed(&self) -> &Conversation {
        &self.seed
    }

    /// Returns the registered tools.
    #[inline]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Runs the loop until the model replies without tool calls.
    ///
    /// Fails without calling the model if no seed message was added. Any
    /// failure inside the loop ends the run; there is no partial result.
    pub async fn run(&self) -> Result<ResponseEnvelope, OrchestrationError> {
        if self.seed.is_empty() {
            error!("cannot run without initial messages");
            return Err(OrchestrationError::NoInitialMessages);
        }

        let mut conversation = self.seed.clone();
        info!("orchestration started ({} seed messages)", conversation.len());
        let message = self
            .drive(&mut conversation)
            .instrument(info_span!("orchestration run"))
            .await
            .inspect_err(|err| error!("orchestration failed: {err}"))?;
        info!("orchestration finished");
        Ok(ResponseEnvelope::new(message))
    }

    async fn drive(
        &self,
        conversation: &mut Conversation,
    ) -> Result<String, TurnError> {
        let tools: Vec<ModelTool> = self.registry.definitions();
        let mut rounds = 0;
        loop {
            let req = ModelRequest {
                messages: conversation.snapshot(),
                tools: tools.clone(),
                tool_choice: ToolChoice::Auto,
            };
            info!("sending model request ({} messages)", req.messages.len());
            let reply = self.model_client.send_request(req).await?;
            info!(
                "received model reply ({} tool calls)",
                reply.tool_calls.len()
            );

            if !reply.has_tool_calls() {
                return Ok(reply.content.unwrap_or_default());
            }
            if rounds == self.max_tool_rounds {
                return Err(TurnError::TooManyToolRounds {
                    limit: self.max_tool_rounds,
                });
            }
            rounds += 1;

            let results = self.dispatch(&reply.tool_calls).await?;
            conversation.append_round(reply.into_message(), results);
        }
    }

    async fn dispatch(
        &self,
        calls: &[ToolCallRequest],
    ) -> Result<Vec<ToolCallResult>, TurnError> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let arguments: Value = serde_json::from_str(&call.arguments)
                .map_err(|err| ToolArgumentError::new(&call.name, err))?;

            let Some(tool) = self.registry.find(&call.name) else {
                warn!("tool not found: {}, skipping", call.name);
                continue;
            };

            info!("calling tool {} ({})", call.name, call.id);
            debug!("tool arguments: {arguments}");
            let result = tool
                .handle(call, arguments)
                .instrument(debug_span!("tool execute", tool = %call.name))
                .await?;
            debug!("tool result: {:?}", result.content);
            results.push(result);
        }
        Ok(results)
    }
}
