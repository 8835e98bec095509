// Library surface for the typing engine, shared by the binary and the
// headless integration tests. Rendering and terminal setup stay in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod history;
pub mod layout;
pub mod runtime;
pub mod scoring;
pub mod session;
mod typing_policy;
pub mod word_source;

pub use error::{Error, Result};
