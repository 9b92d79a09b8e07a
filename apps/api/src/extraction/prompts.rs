// Prompt constants for the extraction module. Placeholders are substituted
// with `str::replace` before sending.

/// Field-extraction prompt template. Replace `{schema_json}` and
/// `{resume_text}` before sending.
///
/// The resume body is wrapped in triple quotes so document content cannot be
/// mistaken for instructions.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the following details from the resume below.
Return STRICT JSON ONLY - no explanations.

Schema:
{schema_json}

Resume:
"""
{resume_text}
"""

Return JSON only:"#;
