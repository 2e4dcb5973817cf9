use serde_json::Value;
use thiserror::Error;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

#[derive(Debug, Error)]
#[error("model output is not valid JSON: {source}")]
pub struct ExtractError {
    #[source]
    source: serde_json::Error,
    /// Leading slice of the text that failed to parse.
    pub snippet: String,
}

/// Returns the JSON payload embedded in free-form model output.
pub fn json_payload(text: &str) -> &str {
    if let Some(start) = text.find(JSON_FENCE) {
        return between_fences(text, start + JSON_FENCE.len());
    }
    if let Some(start) = text.find(FENCE) {
        return between_fences(text, start + FENCE.len());
    }
    text.trim()
}

/// Text from `from` up to the next fence, or the end when unclosed.
fn between_fences(text: &str, from: usize) -> &str {
    let rest = &text[from..];
    let end = rest.find(FENCE).unwrap_or(rest.len());
    rest[..end].trim()
}

pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    let payload = json_payload(text);
    serde_json::from_str(payload).map_err(|source| ExtractError {
        source,
        snippet: payload.chars().take(200).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAYLOAD: &str = r#"{"predicted": 28000, "lower": 25000, "upper": 32000}"#;

    #[test]
    fn fenced_and_bare_forms_agree() {
        let tagged = format!("Here you go:\n```json\n{PAYLOAD}\n```\nThanks!");
        let bare_fence = format!("```\n{PAYLOAD}\n```");
        let plain = format!("  \n{PAYLOAD}\n ");
        let expected = json!({"predicted": 28000, "lower": 25000, "upper": 32000});
        for text in [tagged, bare_fence, plain] {
            assert_eq!(extract_json(&text).unwrap(), expected);
        }
    }

    #[test]
    fn json_tag_wins_over_earlier_plain_fence() {
        let text = format!("```\nnot json\n```\n```json\n{PAYLOAD}\n```");
        assert_eq!(json_payload(&text), PAYLOAD);
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let text = format!("```json\n{PAYLOAD}\n");
        assert_eq!(json_payload(&text), PAYLOAD);
    }

    #[test]
    fn prose_is_a_parse_error_not_repaired() {
        let err = extract_json("I think it is worth about 500 rupees.").unwrap_err();
        assert!(err.snippet.starts_with("I think"));
        assert!(extract_json(r#"{"predicted": 10,}"#).is_err());
    }
}
