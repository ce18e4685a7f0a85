//! Prompt System - Template registration and rendering
//!
//! Built-in templates are registered once with Handlebars; `PromptBuilder`
//! exposes one method per mode and pairs the rendered text with its sampling
//! parameters.

mod builder;
mod render;
pub mod templates;

pub use builder::{DetailLevel, Prompt, PromptBuilder};
pub use render::PromptRenderer;
