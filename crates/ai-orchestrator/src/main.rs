//! A one-shot CLI that draws pictures from a prompt.

#[macro_use]
extern crate tracing;

use std::env;
use std::error::Error as StdError;
use std::process::ExitCode;
use std::time::Duration;

use ai_orchestrator::OrchestratorSetup;
use ai_orchestrator::storage::{HttpStorage, LocalStorage, Storage};
use ai_orchestrator_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";
const DEFAULT_STORAGE_DIR: &str = "images";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return ExitCode::FAILURE;
    };
    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        eprintln!("usage: ai-orchestrator <prompt>");
        return ExitCode::FAILURE;
    }

    let mut config = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        config = config.with_model(model);
    }
    let openai = OpenAIProvider::new(config.build());
    debug!("using {:?}", openai.config());

    let builder = match env::var("STORAGE_BASE_URL") {
        Ok(base_url) => {
            let mut storage = HttpStorage::new(base_url);
            if let Ok(jwt) = env::var("STORAGE_JWT") {
                storage = storage.with_jwt(jwt);
            }
            setup(openai, storage)
        }
        Err(_) => {
            let dir = env::var("STORAGE_DIR")
                .unwrap_or_else(|_| DEFAULT_STORAGE_DIR.to_owned());
            info!("saving images to {dir}");
            setup(openai, LocalStorage::new(dir))
        }
    };
    let mut orchestrator = match builder.build() {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            eprintln!("failed to set up tools: {err}");
            return ExitCode::FAILURE;
        }
    };

    let system_prompt = env::var("SYSTEM_PROMPT")
        .unwrap_or_else(|_| include_str!("./system_prompt.md").to_owned());
    orchestrator
        .add_system_message(system_prompt)
        .add_init_chat_message(prompt);

    let progress_bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {wide_msg}") {
        progress_bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    progress_bar.set_message("🎨 Drawing...");
    progress_bar.enable_steady_tick(Duration::from_millis(100));

    let result = orchestrator.run().await;
    progress_bar.finish_and_clear();

    match result {
        Ok(envelope) => {
            println!(
                "{}🤖 {}",
                BAR_CHAR.bright_cyan(),
                envelope.message().bright_white()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            let bar = BAR_CHAR.bright_red();
            eprintln!("{bar}{}", err.to_string().bold());
            // The first line already includes the turn error.
            let mut source = err.source().and_then(|cause| cause.source());
            while let Some(cause) = source {
                eprintln!("{bar}  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

#[inline]
fn setup<S: Storage + 'static>(
    openai: OpenAIProvider,
    storage: S,
) -> ai_orchestrator::core::OrchestratorBuilder {
    OrchestratorSetup::new(openai, storage).into_builder()
}
