use ai_orchestrator_model::ErrorKind;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::{Error, OpenAIProvider, transport};

/// A request to `/images/generations`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageGenerationRequest {
    /// The text prompt.
    pub prompt: String,
    /// Image size, like `1024x1024` or `auto`.
    pub size: String,
    /// Rendering quality.
    pub quality: String,
    /// Background mode, like `transparent`.
    pub background: String,
}

impl ImageGenerationRequest {
    /// Creates a request for one square, high quality image with a
    /// transparent background.
    #[inline]
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
            size: "1024x1024".to_owned(),
            quality: "high".to_owned(),
            background: "transparent".to_owned(),
        }
    }
}

/// A request to `/images/edits`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageEditRequest {
    /// The reference image, as PNG.
    pub image: Bytes,
    /// The edit prompt.
    pub prompt: String,
    /// Image size, like `1024x1024` or `auto`.
    pub size: String,
    /// Rendering quality.
    pub quality: String,
    /// Background mode, like `transparent`.
    pub background: String,
}

impl ImageEditRequest {
    /// Creates an edit request with automatic size, high quality and a
    /// transparent background.
    #[inline]
    pub fn new<S: Into<String>>(image: Bytes, prompt: S) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            size: "auto".to_owned(),
            quality: "high".to_owned(),
            background: "transparent".to_owned(),
        }
    }
}

/// One generated image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageData {
    /// Base64 encoded image content.
    #[serde(default)]
    pub b64_json: Option<String>,
}

/// The response of the images API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImagesResponse {
    /// Generated images.
    #[serde(default)]
    pub data: Vec<ImageData>,
}

impl ImagesResponse {
    /// Returns the base64 content of the first image, if it is non-empty.
    pub fn first_b64(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|image| image.b64_json.as_deref())
            .filter(|b64| !b64.is_empty())
    }
}

#[derive(Serialize)]
struct GenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    quality: &'a str,
    background: &'a str,
}

impl OpenAIProvider {
    /// Generates one image from a prompt.
    pub fn generate_image(
        &self,
        req: ImageGenerationRequest,
    ) -> impl Future<Output = Result<ImagesResponse, Error>> + Send + 'static
    {
        let client = self.client.clone();
        let url = self.endpoint("/images/generations");
        let api_key = self.config.api_key.clone();
        let model = self.config.image_model.clone();
        let max_elapsed = self.config.max_retry_elapsed;

        async move {
            debug!("requesting image generation");
            transport::send_with_retry(
                || {
                    Ok(client.post(&url).bearer_auth(&api_key).json(
                        &GenerationBody {
                            model: &model,
                            prompt: &req.prompt,
                            n: 1,
                            size: &req.size,
                            quality: &req.quality,
                            background: &req.background,
                        },
                    ))
                },
                max_elapsed,
            )
            .await
        }
    }

    /// Creates a new image from a reference image and a prompt.
    pub fn edit_image(
        &self,
        req: ImageEditRequest,
    ) -> impl Future<Output = Result<ImagesResponse, Error>> + Send + 'static
    {
        let client = self.client.clone();
        let url = self.endpoint("/images/edits");
        let api_key = self.config.api_key.clone();
        let model = self.config.image_model.clone();
        let max_elapsed = self.config.max_retry_elapsed;

        async move {
            debug!("requesting image edit ({} bytes)", req.image.len());
            transport::send_with_retry(
                || {
                    let form = edit_form(&req, &model)?;
                    Ok(client.post(&url).bearer_auth(&api_key).multipart(form))
                },
                max_elapsed,
            )
            .await
        }
    }
}

fn edit_form(req: &ImageEditRequest, model: &str) -> Result<Form, Error> {
    let image = Part::bytes(req.image.to_vec())
        .file_name("image.png")
        .mime_str(mime::IMAGE_PNG.as_ref())
        .map_err(|err| {
            Error::new(format!("invalid image part: {err}"), ErrorKind::Other)
        })?;
    Ok(Form::new()
        .part("image", image)
        .text("prompt", req.prompt.clone())
        .text("model", model.to_owned())
        .text("n", "1")
        .text("size", req.size.clone())
        .text("quality", req.quality.clone())
        .text("background", req.background.clone()))
}
