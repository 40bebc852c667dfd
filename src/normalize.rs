use serde_json::Value;

pub const NO_RESPONSE: &str = "No response received";
pub const ERROR_PREFIX: &str = "Error:";

/// Pulls a plain answer out of whatever JSON the knowledge service returned.
///
/// Rules are tried in order and the first one that applies wins:
/// an `error` string, `data[0].response`, a string `data[0]`, a top-level
/// `response` string. Anything else yields [`NO_RESPONSE`].
pub fn extract(payload: &Value) -> String {
    error_message(payload)
        .or_else(|| data_object_response(payload))
        .or_else(|| data_string(payload))
        .or_else(|| top_level_response(payload))
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}

/// True when `text` came from the error or fallthrough rules rather than an answer.
pub fn is_unanswered(text: &str) -> bool {
    text == NO_RESPONSE || text.starts_with(ERROR_PREFIX)
}

fn error_message(payload: &Value) -> Option<String> {
    payload
        .get("error")
        .and_then(Value::as_str)
        .map(|err| format!("{ERROR_PREFIX} {err}"))
}

fn first_data_item(payload: &Value) -> Option<&Value> {
    payload.get("data").and_then(Value::as_array)?.first()
}

fn data_object_response(payload: &Value) -> Option<String> {
    first_data_item(payload)?
        .get("response")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn data_string(payload: &Value) -> Option<String> {
    first_data_item(payload)?.as_str().map(str::to_string)
}

fn top_level_response(payload: &Value) -> Option<String> {
    payload
        .get("response")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_field_is_prefixed() {
        assert_eq!(extract(&json!({ "error": "bad" })), "Error: bad");
    }

    #[test]
    fn error_rule_takes_priority_over_data() {
        let payload = json!({ "error": "quota exceeded", "data": ["ignored"] });
        assert_eq!(extract(&payload), "Error: quota exceeded");
    }

    #[test]
    fn data_object_response_is_extracted() {
        assert_eq!(extract(&json!({ "data": [{ "response": "hi" }] })), "hi");
    }

    #[test]
    fn data_string_is_extracted() {
        assert_eq!(extract(&json!({ "data": ["hello", "world"] })), "hello");
    }

    #[test]
    fn top_level_response_is_extracted() {
        assert_eq!(extract(&json!({ "response": "x", "status": "success" })), "x");
    }

    #[test]
    fn empty_object_yields_sentinel() {
        assert_eq!(extract(&json!({})), NO_RESPONSE);
    }

    #[test]
    fn mismatched_shapes_yield_sentinel() {
        let payloads = [
            Value::Null,
            json!([]),
            json!(["loose", "array"]),
            json!("just a string"),
            json!(42),
            json!({ "data": [] }),
            json!({ "data": "not an array" }),
            json!({ "data": [{ "answer": "wrong key" }] }),
            json!({ "data": [null] }),
            json!({ "data": [{ "response": 7 }] }),
            json!({ "error": { "code": 500 } }),
            json!({ "response": null }),
        ];

        for payload in payloads {
            assert_eq!(extract(&payload), NO_RESPONSE, "payload: {payload}");
        }
    }

    #[test]
    fn non_string_error_falls_through_to_later_rules() {
        let payload = json!({ "error": null, "response": "still answered" });
        assert_eq!(extract(&payload), "still answered");
    }

    #[test]
    fn unanswered_detection() {
        assert!(is_unanswered(NO_RESPONSE));
        assert!(is_unanswered("Error: upstream busy"));
        assert!(!is_unanswered("Jon Snow knows nothing."));
    }
}
