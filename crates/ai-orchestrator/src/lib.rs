//! An image-drawing orchestrator that assembles the OpenAI provider, the image
//! tools and a storage backend.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring the orchestrator into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod setup;
pub mod storage;
pub mod tools;

pub use setup::OrchestratorSetup;

/// Re-exports of [`ai_orchestrator_core`] crate.
pub mod core {
    pub use ai_orchestrator_core::*;
}
