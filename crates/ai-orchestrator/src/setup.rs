use std::sync::Arc;

use ai_orchestrator_core::OrchestratorBuilder;
use ai_orchestrator_openai_model::OpenAIProvider;

use crate::storage::Storage;
use crate::tools::*;

/// Wires the image tools to an OpenAI provider and a storage backend.
///
/// The provider serves both the chat model and the images API.
pub struct OrchestratorSetup {
    openai: OpenAIProvider,
    storage: Arc<dyn Storage>,
}

impl OrchestratorSetup {
    /// Creates a setup with the given provider and storage.
    #[inline]
    pub fn new<S: Storage + 'static>(
        openai: OpenAIProvider,
        storage: S,
    ) -> Self {
        Self {
            openai,
            storage: Arc::new(storage),
        }
    }

    /// Returns a builder with `generate_image` and `edit_image_from_url`
    /// registered. More tools can be added before building.
    pub fn into_builder(self) -> OrchestratorBuilder {
        let generate = GenerateImageTool::new(
            self.openai.clone(),
            Arc::clone(&self.storage),
        );
        let edit = EditImageTool::new(self.openai.clone(), self.storage);
        OrchestratorBuilder::with_model_provider(self.openai)
            .with_tool(generate)
            .with_tool(edit)
    }
}
