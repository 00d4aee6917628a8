use std::error::Error as StdError;
use std::fmt::{self, Display};

use ai_orchestrator_model::{ErrorKind, ModelProviderError};
use thiserror::Error;

use crate::tool;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The error returned by [`Orchestrator::run`](crate::Orchestrator::run).
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The orchestrator was run without any seed message.
    #[error("no initial messages")]
    NoInitialMessages,
    /// A turn failed. The original cause is kept as the source.
    #[error("orchestration failed: {0}")]
    Failed(#[from] TurnError),
}

impl OrchestrationError {
    /// Returns the turn error that caused the failure, if any.
    #[inline]
    pub fn turn_error(&self) -> Option<&TurnError> {
        match self {
            Self::NoInitialMessages => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// A fatal failure inside the loop.
#[derive(Debug, Error)]
pub enum TurnError {
    /// The model could not be reached or replied with garbage.
    #[error(transparent)]
    ModelCommunication(#[from] ModelCommunicationError),
    /// The model requested a tool call with arguments that are not JSON.
    #[error(transparent)]
    ToolArgument(#[from] ToolArgumentError),
    /// A tool failed.
    #[error(transparent)]
    ToolExecution(#[from] ToolExecutionError),
    /// The model kept requesting tools past the configured limit.
    #[error("too many tool rounds (limit: {limit})")]
    TooManyToolRounds {
        /// The configured maximum number of tool rounds.
        limit: usize,
    },
}

/// Failed to get a usable reply from the model provider.
#[derive(Debug, Error)]
#[error("model communication failed ({kind})")]
pub struct ModelCommunicationError {
    kind: ErrorKind,
    source: BoxError,
}

impl ModelCommunicationError {
    pub(crate) fn new<E: ModelProviderError>(err: E) -> Self {
        Self {
            kind: err.kind(),
            source: Box::new(err),
        }
    }

    /// Returns the kind reported by the provider.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// The raw arguments of a tool call are not valid JSON.
#[derive(Debug, Error)]
#[error("invalid arguments for tool `{tool}`")]
pub struct ToolArgumentError {
    tool: String,
    source: serde_json::Error,
}

impl ToolArgumentError {
    pub(crate) fn new(tool: &str, source: serde_json::Error) -> Self {
        Self {
            tool: tool.to_owned(),
            source,
        }
    }

    /// Returns the name of the requested tool.
    #[inline]
    pub fn tool(&self) -> &str {
        &self.tool
    }
}

/// Whether a tool failure was reported by the tool itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolFailureKind {
    /// The tool returned a [`tool::Error`].
    Declared,
    /// Anything else: undecodable input, a panic, or an error from a custom
    /// [`ToolObject`](crate::tool::ToolObject).
    Unexpected,
}

impl Display for ToolFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared => write!(f, "declared"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// A tool failed while handling a call.
#[derive(Debug, Error)]
#[error("tool `{tool}` failed ({kind})")]
pub struct ToolExecutionError {
    tool: String,
    kind: ToolFailureKind,
    source: BoxError,
}

impl ToolExecutionError {
    /// Wraps an error reported by the tool.
    #[inline]
    pub fn declared<S: Into<String>>(tool: S, err: tool::Error) -> Self {
        Self {
            tool: tool.into(),
            kind: ToolFailureKind::Declared,
            source: Box::new(err),
        }
    }

    /// Wraps any other failure of the tool.
    #[inline]
    pub fn unexpected<S, E>(tool: S, err: E) -> Self
    where
        S: Into<String>,
        E: Into<BoxError>,
    {
        Self {
            tool: tool.into(),
            kind: ToolFailureKind::Unexpected,
            source: err.into(),
        }
    }

    /// Returns the name of the failed tool.
    #[inline]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Returns the failure kind.
    #[inline]
    pub fn kind(&self) -> ToolFailureKind {
        self.kind
    }

    /// Returns the error reported by the tool, for declared failures.
    #[inline]
    pub fn declared_error(&self) -> Option<&tool::Error> {
        self.source.downcast_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_chain_names_tool() {
        let err = OrchestrationError::from(TurnError::from(
            ToolExecutionError::unexpected("generate_image", "boom"),
        ));
        let mut messages = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            messages.push(cause.to_string());
            source = cause.source();
        }
        assert_eq!(
            messages,
            [
                "orchestration failed: tool `generate_image` failed \
                 (unexpected)",
                "tool `generate_image` failed (unexpected)",
                "boom",
            ]
        );
    }

    #[test]
    fn test_declared_error() {
        let err = ToolExecutionError::declared(
            "generate_image",
            tool::Error::upstream().with_reason("no image"),
        );
        assert_eq!(err.kind(), ToolFailureKind::Declared);
        assert_eq!(
            err.declared_error().map(|err| err.kind()),
            Some(tool::ErrorKind::Upstream)
        );

        let err = ToolExecutionError::unexpected("generate_image", "boom");
        assert!(err.declared_error().is_none());
    }
}
