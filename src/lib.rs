// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod word_generator;

pub use error::{Error, Result};
