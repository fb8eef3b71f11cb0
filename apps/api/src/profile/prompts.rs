// Profile extraction LLM prompt templates.
// All prompts for the profile module are defined here.

pub const PROFILE_EXTRACT_SYSTEM: &str = "\
You are a precise resume data extractor. \
Read a resume and return the candidate's profile as structured JSON. \
You MUST respond with valid JSON only. No markdown fences, no explanations.";

/// Replace `{no_invention}` and `{raw_text}` before sending.
pub const PROFILE_EXTRACT_PROMPT: &str = r#"Extract profile information and return ONLY valid JSON.

Format:
{
  "name": "Full Name",
  "role": "Job Title",
  "skills": ["skill1", "skill2"],
  "experience_years": 5,
  "projects": [{"title": "Name", "description": "Desc"}]
}

{no_invention}

Resume:
{raw_text}

Return ONLY the JSON object."#;
