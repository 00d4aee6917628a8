//! Image tools that models can use.

mod edit_image;
mod generate_image;

pub use edit_image::EditImageTool;
pub use generate_image::GenerateImageTool;

use ai_orchestrator_core::tool::Error as ToolError;

use crate::storage::{File, Storage};

const PNG: &str = "image/png";

/// Persists a base64 PNG and wraps its location in an `<img>` tag.
async fn save_png(
    storage: &dyn Storage,
    b64: &str,
) -> Result<String, ToolError> {
    let path = storage
        .persist_file(File::new(b64, PNG))
        .await
        .map_err(|err| {
            error!("failed to save image: {err}");
            ToolError::upstream()
                .with_reason(format!("failed to save image: {err}"))
        })?;
    info!("image saved to {path}");
    Ok(format!("<img src=\"{path}\">"))
}
