use std::sync::Arc;

use ai_orchestrator_core::tool::{Error as ToolError, Tool, ToolResult};
use ai_orchestrator_openai_model::{ImageGenerationRequest, OpenAIProvider};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use super::save_png;
use crate::storage::Storage;

#[derive(Deserialize, JsonSchema)]
pub struct GenerateImageParameters {
    #[schemars(description = "What the image should show.")]
    prompt: String,
}

/// A tool that generates an image from a prompt and saves it.
pub struct GenerateImageTool {
    openai: OpenAIProvider,
    storage: Arc<dyn Storage>,
    parameter_schema: Value,
}

impl GenerateImageTool {
    /// Creates a new generate image tool.
    #[inline]
    pub fn new(openai: OpenAIProvider, storage: Arc<dyn Storage>) -> Self {
        Self {
            openai,
            storage,
            parameter_schema: schema_for!(GenerateImageParameters).to_value(),
        }
    }
}

impl Tool for GenerateImageTool {
    type Input = GenerateImageParameters;

    fn name(&self) -> &str {
        "generate_image"
    }

    fn description(&self) -> &str {
        "Generates an image from a prompt and returns <img> tag with the saved \
image."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: GenerateImageParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let storage = Arc::clone(&self.storage);
        let prompt = input.prompt;
        debug!("generating image for prompt: {prompt}");
        let generation = (!prompt.trim().is_empty()).then(|| {
            self.openai
                .generate_image(ImageGenerationRequest::new(prompt))
        });

        async move {
            let Some(generation) = generation else {
                return Err(ToolError::invalid_input()
                    .with_reason("`prompt` must not be empty"));
            };
            let images = generation.await.map_err(|err| {
                error!("image generation failed: {err}");
                ToolError::upstream()
                    .with_reason(format!("OpenAI API error: {err}"))
            })?;
            let Some(b64) = images.first_b64() else {
                warn!("image generation returned no image data");
                return Err(ToolError::execution_error()
                    .with_reason("Missing image data in API response"));
            };
            save_png(storage.as_ref(), b64).await
        }
    }
}
