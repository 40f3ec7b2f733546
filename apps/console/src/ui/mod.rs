//! UI layer: pure renderers, view binding, file selection and prompts.

pub mod files;
pub mod prompt;
pub mod render;
pub mod view;
