// Shared prompt constants.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction that keeps extracted facts tied to the source text.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Use ONLY facts stated in the resume. Do NOT infer, interpolate, or invent details. \
    If a field is not present in the resume, use an empty list, 0, or an empty string.";
