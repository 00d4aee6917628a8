use std::sync::Arc;

use ai_orchestrator_core::tool::{Error as ToolError, Tool, ToolResult};
use ai_orchestrator_openai_model::{ImageEditRequest, OpenAIProvider};
use bytes::Bytes;
use reqwest::Client;
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use super::save_png;
use crate::storage::Storage;

const STYLE_PROMPT: &str = "Repaint the image preserving its original style, \
composition, color palette, and texture exactly as in the reference. Do not \
change the style. Maintain the detailed elements, character designs, and \
shading exactly like the original image. Make the modifications requested \
without altering the artistic style, keeping the same type of drawing and \
anime aesthetic as the reference. ";

#[derive(Deserialize, JsonSchema)]
pub struct EditImageParameters {
    #[schemars(description = "URL of the reference image.")]
    url: String,
    #[schemars(description = "The modifications to make.")]
    prompt: String,
}

/// A tool that creates a new image from a reference image URL and a prompt,
/// keeping the style of the reference.
pub struct EditImageTool {
    openai: OpenAIProvider,
    storage: Arc<dyn Storage>,
    client: Client,
    parameter_schema: Value,
}

impl EditImageTool {
    /// Creates a new edit image tool.
    #[inline]
    pub fn new(openai: OpenAIProvider, storage: Arc<dyn Storage>) -> Self {
        Self {
            openai,
            storage,
            client: Client::new(),
            parameter_schema: schema_for!(EditImageParameters).to_value(),
        }
    }
}

impl Tool for EditImageTool {
    type Input = EditImageParameters;

    fn name(&self) -> &str {
        "edit_image_from_url"
    }

    fn description(&self) -> &str {
        "Create image with inspiration by image from a URL based on a prompt \
and returns <img> tag with the created image."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: EditImageParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let openai = self.openai.clone();
        let client = self.client.clone();
        let storage = Arc::clone(&self.storage);

        async move {
            let EditImageParameters { url, prompt } = input;
            let prompt = format!("{STYLE_PROMPT}{prompt}");
            debug!("starting image edit for URL: {url}");
            debug!("full prompt: {prompt}");

            let image = download(&client, &url).await?;
            let images = openai
                .edit_image(ImageEditRequest::new(image, prompt))
                .await
                .map_err(|err| {
                    error!("image edit failed: {err}");
                    ToolError::upstream()
                        .with_reason(format!("OpenAI API error: {err}"))
                })?;
            let Some(b64) = images.first_b64() else {
                warn!("image edit returned no image data for URL: {url}");
                return Err(ToolError::execution_error()
                    .with_reason("Missing image data in API response"));
            };
            save_png(storage.as_ref(), b64).await
        }
    }
}

async fn download(client: &Client, url: &str) -> Result<Bytes, ToolError> {
    let failed = |detail: String| {
        error!("failed to download image from {url}: {detail}");
        ToolError::upstream()
            .with_reason(format!("Could not download image from URL: {url}"))
    };

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|err| failed(err.to_string()))?;
    if !resp.status().is_success() {
        return Err(failed(format!("HTTP status {}", resp.status())));
    }
    let image = resp.bytes().await.map_err(|err| failed(err.to_string()))?;
    info!("downloaded reference image ({} bytes)", image.len());
    Ok(image)
}
