//! Core logic of the orchestrator: the tool-calling loop, conversation,
//! tool registry and the error taxonomy.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod conversation;
mod error;
mod model_client;
mod orchestrator;
mod response;
pub mod tool;

pub use error::{
    ModelCommunicationError, OrchestrationError, ToolArgumentError,
    ToolExecutionError, ToolFailureKind, TurnError,
};
pub use orchestrator::{
    DEFAULT_MAX_TOOL_ROUNDS, Orchestrator, OrchestratorBuilder,
};
pub use response::{Attachment, ResponseEnvelope};
