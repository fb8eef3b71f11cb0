// Template catalog, rule-based selection, and HTML rendering.
// No LLM calls in this module.

pub mod handlers;
pub mod registry;
pub mod render;
pub mod selector;

pub use registry::{Registry, RegistryError, TemplateDescriptor};
