//! Structured field extraction — turns a flat resume text blob into a
//! structured record by delegating the reasoning to the completion
//! capability and validating that its reply parses as JSON.

use serde_json::{Map, Value};

use crate::completion::CompletionClient;
use crate::errors::AppError;
use crate::extraction::prompts::EXTRACTION_PROMPT_TEMPLATE;
use crate::extraction::schema::Schema;

/// A parsed key-value record as produced by the completion capability.
///
/// The shape is best-effort: keys are not checked against the schema and
/// value types are not coerced. The only guarantee is that the reply parsed
/// as a JSON object.
pub type ExtractedRecord = Map<String, Value>;

/// Builds the single instruction payload: task statement, schema rendering,
/// and the resume text delimited by triple quotes.
pub fn build_extraction_prompt(schema: &Schema, resume_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE
        .replace("{schema_json}", &schema.placeholder_json())
        .replace("{resume_text}", resume_text)
}

/// Extracts the schema's fields from `resume_text` in a single pass.
///
/// Completion failures and unparseable replies are both converted to
/// `AppError` here; neither propagates as a fault past this boundary.
/// No retry, no repair, no partial recovery.
pub async fn extract_fields(
    resume_text: &str,
    schema: &Schema,
    completion: &dyn CompletionClient,
) -> Result<ExtractedRecord, AppError> {
    let prompt = build_extraction_prompt(schema, resume_text);

    let raw = completion
        .complete(&prompt)
        .await
        .map_err(|e| AppError::Completion(e.to_string()))?;

    let cleaned = strip_json_fences(&raw);

    serde_json::from_str::<ExtractedRecord>(cleaned).map_err(|e| {
        AppError::MalformedResponse(format!("completion output is not a JSON object: {e}"))
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from completion output.
/// These are formatting artifacts, not data; stripping is idempotent and
/// leaves the inner content untouched.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use async_trait::async_trait;

    /// Returns a fixed reply regardless of the prompt.
    struct CannedCompletion(String);

    #[async_trait]
    impl CompletionClient for CannedCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            Ok(self.0.clone())
        }
    }

    /// Fails every call with a timeout.
    struct TimedOutCompletion;

    #[async_trait]
    impl CompletionClient for TimedOutCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Timeout(60))
        }
    }

    const RESUME_TEXT: &str =
        "John Doe, B.Tech CSE, CGPA 8.5, john@x.com, 9999999999, Python/Go";

    const SCENARIO_A: &str = r#"{"full_name":"John Doe","roll_number":"","branch":"CSE","cgpa":"8.5","email":"john@x.com","phone":"9999999999","skills":["Python","Go"]}"#;

    #[test]
    fn test_prompt_embeds_schema_and_delimited_resume() {
        let schema = Schema::resume_default();
        let prompt = build_extraction_prompt(&schema, RESUME_TEXT);

        assert!(prompt.contains("Return STRICT JSON ONLY"));
        assert!(prompt.contains(&schema.placeholder_json()));
        assert!(prompt.contains(&format!("\"\"\"\n{RESUME_TEXT}\n\"\"\"")));
        assert!(!prompt.contains("{schema_json}"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[tokio::test]
    async fn test_extract_fields_returns_exact_parsed_record() {
        let schema = Schema::resume_default();
        let completion = CannedCompletion(SCENARIO_A.to_string());

        let record = extract_fields(RESUME_TEXT, &schema, &completion).await.unwrap();

        let expected: ExtractedRecord = serde_json::from_str(SCENARIO_A).unwrap();
        assert_eq!(record, expected);
        for name in schema.field_names() {
            assert!(record.contains_key(name), "record is missing field {name}");
        }
    }

    #[tokio::test]
    async fn test_fenced_and_unfenced_replies_parse_identically() {
        let schema = Schema::resume_default();
        let unfenced = CannedCompletion(SCENARIO_A.to_string());
        let fenced = CannedCompletion(format!("```json\n{SCENARIO_A}\n```"));

        let from_unfenced = extract_fields(RESUME_TEXT, &schema, &unfenced).await.unwrap();
        let from_fenced = extract_fields(RESUME_TEXT, &schema, &fenced).await.unwrap();

        assert_eq!(from_fenced, from_unfenced);
    }

    #[tokio::test]
    async fn test_prose_reply_is_malformed_response() {
        let schema = Schema::resume_default();
        let completion = CannedCompletion("I cannot extract this information.".to_string());

        let err = extract_fields(RESUME_TEXT, &schema, &completion).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_truncated_json_is_malformed_response() {
        let schema = Schema::resume_default();
        let completion = CannedCompletion(r#"{"full_name": "John Doe", "skills": ["Py"#.to_string());

        let err = extract_fields(RESUME_TEXT, &schema, &completion).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_non_object_json_is_malformed_response() {
        let schema = Schema::resume_default();
        let completion = CannedCompletion(r#"["John Doe", "CSE"]"#.to_string());

        let err = extract_fields(RESUME_TEXT, &schema, &completion).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_completion_timeout_surfaces_as_completion_error() {
        let schema = Schema::resume_default();

        let err = extract_fields(RESUME_TEXT, &schema, &TimedOutCompletion)
            .await
            .unwrap_err();
        match err {
            AppError::Completion(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected Completion error, got {other:?}"),
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_is_idempotent() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        let once = strip_json_fences(input);
        assert_eq!(strip_json_fences(once), once);
    }

    #[test]
    fn test_strip_json_fences_preserves_inner_content() {
        let body = "{\"note\": \"contains ``` inside a string\"}";
        let input = format!("```json\n{body}\n```");
        assert_eq!(strip_json_fences(&input), body);
    }
}
