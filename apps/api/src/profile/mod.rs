// Profile: prompt building, LLM extraction, normalization, and the portfolio schema.

pub mod extract;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod schema;
