use gateway::CompletionGateway;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ExtractError;

/// Two total attempts: the original request plus one corrective retry.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

const JSON_REMINDER: &str = "Reminder: respond with ONLY valid JSON. No commentary.";

/// Prompt the gateway and parse the reply as a JSON array of objects.
///
/// Parse failures are retried up to `max_attempts` total calls, re-issuing
/// the same semantic prompt with a corrective reminder appended to the user
/// prompt. Valid JSON with the wrong top-level shape is a protocol
/// violation by the model and fails immediately.
pub async fn decode_json_array<G: CompletionGateway>(
    gateway: &G,
    system_prompt: &str,
    user_prompt: &str,
    max_attempts: usize,
) -> Result<Vec<Map<String, Value>>, ExtractError> {
    let max_attempts = max_attempts.max(1);
    let mut user_prompt = user_prompt.to_string();
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        let raw = gateway.complete(system_prompt, &user_prompt).await?;
        let cleaned = strip_code_fences(&raw);

        match serde_json::from_str::<Value>(&cleaned) {
            Ok(Value::Array(items)) => return Ok(collect_objects(items)),
            Ok(other) => {
                return Err(ExtractError::Shape {
                    found: json_type_name(&other),
                });
            }
            Err(error) => {
                warn!(attempt, max_attempts, %error, "model response was not valid JSON");
                last_error = Some(error);
                if attempt < max_attempts {
                    user_prompt.push_str("\n\n");
                    user_prompt.push_str(JSON_REMINDER);
                }
            }
        }
    }

    Err(ExtractError::Decode {
        attempts: max_attempts,
        source: last_error.expect("at least one attempt was made"),
    })
}

/// Remove a wrapping markdown code fence (with optional language tag) and
/// stray backticks from a model reply.
fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();

    let open = Regex::new(r"^```[A-Za-z]*\s*").unwrap();
    let close = Regex::new(r"\s*```$").unwrap();

    let without_open = open.replace(trimmed, "");
    let without_close = close.replace(&without_open, "");

    without_close.trim().trim_matches('`').trim().to_string()
}

/// Keep the array's objects, in order. Anything else in the array is a
/// record-level problem and gets dropped.
fn collect_objects(items: Vec<Value>) -> Vec<Map<String, Value>> {
    let mut objects = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(map) => objects.push(map),
            other => debug!(kind = json_type_name(&other), "dropping non-object array element"),
        }
    }
    objects
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("`[]`"), "[]");
        assert_eq!(strip_code_fences("  [\"a\"]  "), "[\"a\"]");
        assert_eq!(strip_code_fences("no fences here"), "no fences here");
    }

    #[tokio::test]
    async fn test_decodes_fenced_empty_array() {
        let gateway = ScriptedGateway::new(vec!["```json\n[]\n```"]);

        let records = decode_json_array(&gateway, "sys", "user", 2).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_once_then_succeeds() {
        let gateway = ScriptedGateway::new(vec![
            "here you go: not json",
            r#"[{"name": "Alice"}]"#,
        ]);

        let records = decode_json_array(&gateway, "sys", "user", 2).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Alice");
        assert_eq!(gateway.calls(), 2);
        // The retry keeps the semantic prompt and appends the reminder.
        let prompts = gateway.user_prompts();
        assert!(prompts[1].starts_with("user"));
        assert!(prompts[1].ends_with(JSON_REMINDER));
    }

    #[tokio::test]
    async fn test_exhausted_attempts_are_a_decode_error() {
        let gateway = ScriptedGateway::new(vec!["garbage", "more garbage", "unused"]);

        let result = decode_json_array(&gateway, "sys", "user", 2).await;

        assert!(matches!(
            result,
            Err(ExtractError::Decode { attempts: 2, .. })
        ));
        // No further call after the Nth consecutive failure.
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_wrong_shape_fails_without_retry() {
        let gateway = ScriptedGateway::new(vec![r#"{"entities": []}"#, "unused"]);

        let result = decode_json_array(&gateway, "sys", "user", 2).await;

        assert!(matches!(
            result,
            Err(ExtractError::Shape { found: "object" })
        ));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_object_elements_are_dropped() {
        let gateway = ScriptedGateway::new(vec![r#"[{"name": "A"}, 7, "x", {"name": "B"}]"#]);

        let records = decode_json_array(&gateway, "sys", "user", 2).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "A");
        assert_eq!(records[1]["name"], "B");
    }

    #[tokio::test]
    async fn test_zero_attempts_still_makes_one_call() {
        let gateway = ScriptedGateway::new(vec!["[]"]);

        let records = decode_json_array(&gateway, "sys", "user", 0).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(gateway.calls(), 1);
    }
}
