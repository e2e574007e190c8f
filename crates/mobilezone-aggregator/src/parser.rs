//! Parse provider reply text into phone candidates

use crate::error::AggregatorError;
use mobilezone_domain::traits::EMPTY_PAYLOAD;
use serde_json::{Map, Value};
use tracing::warn;

/// One loosely-typed phone the model reported
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneCandidate {
    /// Model name
    pub name: String,
    /// Manufacturer
    pub brand: String,
    /// Price in the market's currency
    pub price: f64,
    /// Chipset, if reported
    pub processor: Option<String>,
    /// Memory, if reported
    pub ram: Option<String>,
    /// Built-in storage, if reported
    pub storage: Option<String>,
    /// Screen, if reported
    pub display: Option<String>,
    /// Camera setup, if reported
    pub camera: Option<String>,
    /// Battery capacity, if reported
    pub battery: Option<String>,
    /// Operating system, if reported
    pub os: Option<String>,
}

/// Parsed reply: optional summary plus the usable candidates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPayload {
    /// Market summary
    pub summary: Option<String>,
    /// Candidates that carried a name, brand and usable price
    pub candidates: Vec<PhoneCandidate>,
}

/// Parse reply text into a payload
///
/// Malformed candidates are skipped with a warning; only a reply that is
/// not a JSON object at all is an error.
pub fn parse_payload(text: Option<&str>) -> Result<ParsedPayload, AggregatorError> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => EMPTY_PAYLOAD,
    };

    let json_str = extract_json(text)?;
    let json: Value = serde_json::from_str(&json_str)?;

    let obj = json
        .as_object()
        .ok_or_else(|| AggregatorError::InvalidFormat("Expected JSON object".to_string()))?;

    let summary = obj
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let candidates = match obj.get("phones") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => parse_candidates(items),
        Some(other) => {
            warn!("Ignoring 'phones' that is not an array: {}", other);
            Vec::new()
        }
    };

    Ok(ParsedPayload {
        summary,
        candidates,
    })
}

fn parse_candidates(items: &[Value]) -> Vec<PhoneCandidate> {
    let mut candidates = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match parse_candidate(item) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!("Skipping phone candidate {}: {}", idx, e),
        }
    }
    candidates
}

/// Extract JSON from the reply, handling markdown code fences
fn extract_json(text: &str) -> Result<String, AggregatorError> {
    let trimmed = text.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(AggregatorError::InvalidFormat("Empty code block".to_string()));
        }

        // Drop the opening fence and, when present, the closing one
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_candidate(json: &Value) -> Result<PhoneCandidate, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Candidate is not a JSON object".to_string())?;

    let name = required_text(obj, "name")?;
    let brand = required_text(obj, "brand")?;
    let price = obj
        .get("price")
        .and_then(coerce_price)
        .ok_or_else(|| "Missing or invalid 'price'".to_string())?;

    Ok(PhoneCandidate {
        name,
        brand,
        price,
        processor: optional_text(obj, "processor"),
        ram: optional_text(obj, "ram"),
        storage: optional_text(obj, "storage"),
        display: optional_text(obj, "display"),
        camera: optional_text(obj, "camera"),
        battery: optional_text(obj, "battery"),
        os: optional_text(obj, "os"),
    })
}

fn required_text(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
    optional_text(obj, key).ok_or_else(|| format!("Missing or invalid '{}'", key))
}

/// Non-empty text field; numbers are accepted and rendered as text
fn optional_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accept numbers and numeric strings like "Rs. 129,999/-"; reject negatives
///
/// In a string, the first run of digits, commas and dots is the amount; any
/// currency prefix or trailing text is ignored.
fn coerce_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let start = s.find(|c: char| c.is_ascii_digit())?;
            let amount: String = s[start..]
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
                .filter(|c| *c != ',')
                .collect();
            let amount = amount.trim_end_matches('.').parse::<f64>().ok()?;
            if s[..start].ends_with('-') {
                -amount
            } else {
                amount
            }
        }
        _ => return None,
    };

    (price.is_finite() && price >= 0.0).then_some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_payload() {
        let text = r#"{
            "summary": "Samsung leads the flagship market.",
            "phones": [
                { "name": "Galaxy S24", "brand": "Samsung", "price": 299999, "ram": "8GB" }
            ]
        }"#;

        let payload = parse_payload(Some(text)).unwrap();
        assert_eq!(
            payload.summary.as_deref(),
            Some("Samsung leads the flagship market.")
        );
        assert_eq!(payload.candidates.len(), 1);
        assert_eq!(payload.candidates[0].name, "Galaxy S24");
        assert_eq!(payload.candidates[0].price, 299999.0);
        assert_eq!(payload.candidates[0].ram.as_deref(), Some("8GB"));
        assert!(payload.candidates[0].processor.is_none());
    }

    #[test]
    fn test_missing_text_uses_empty_payload() {
        let payload = parse_payload(None).unwrap();
        assert_eq!(payload.summary.as_deref(), Some("No data found."));
        assert!(payload.candidates.is_empty());

        let payload = parse_payload(Some("   ")).unwrap();
        assert_eq!(payload.summary.as_deref(), Some("No data found."));
    }

    #[test]
    fn test_parse_payload_with_markdown_wrapper() {
        let text = "```json\n{\"summary\": \"ok\", \"phones\": []}\n```";
        let payload = parse_payload(Some(text)).unwrap();
        assert_eq!(payload.summary.as_deref(), Some("ok"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_payload(Some("This is not JSON"));
        assert!(matches!(result, Err(AggregatorError::JsonParse(_))));
    }

    #[test]
    fn test_parse_json_not_object() {
        let result = parse_payload(Some("[1, 2, 3]"));
        assert!(matches!(result, Err(AggregatorError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_summary_and_phones() {
        let payload = parse_payload(Some("{}")).unwrap();
        assert!(payload.summary.is_none());
        assert!(payload.candidates.is_empty());
    }

    #[test]
    fn test_phones_not_array_is_ignored() {
        let payload = parse_payload(Some(r#"{"summary": "x", "phones": "none"}"#)).unwrap();
        assert!(payload.candidates.is_empty());
    }

    #[test]
    fn test_parse_partial_success() {
        let text = json!({
            "phones": [
                { "name": "Galaxy A55", "brand": "Samsung", "price": 129999 },
                { "name": "No Brand", "price": 100 },
                "just a string",
                { "name": "Negative", "brand": "X", "price": -1 },
                { "name": "Pixel 8", "brand": "Google", "price": "Rs. 189,999" },
                { "name": "Redmi 13", "brand": "Xiaomi", "price": "42,999 PKR" }
            ]
        })
        .to_string();

        let payload = parse_payload(Some(&text)).unwrap();
        let names: Vec<&str> = payload.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Galaxy A55", "Pixel 8", "Redmi 13"]);
        assert_eq!(payload.candidates[1].price, 189999.0);
        assert_eq!(payload.candidates[2].price, 42999.0);
    }

    #[test]
    fn test_coerce_price() {
        assert_eq!(coerce_price(&json!(100)), Some(100.0));
        assert_eq!(coerce_price(&json!(99.5)), Some(99.5));
        assert_eq!(coerce_price(&json!("129,999")), Some(129999.0));
        assert_eq!(coerce_price(&json!("Rs. 45,000")), Some(45000.0));
        assert_eq!(coerce_price(&json!("Rs. 129,999/-")), Some(129999.0));
        assert_eq!(coerce_price(&json!("129,999 PKR")), Some(129999.0));
        assert_eq!(coerce_price(&json!("PKR 45000 approx")), Some(45000.0));
        assert_eq!(coerce_price(&json!("Rs. 1,249.50 only")), Some(1249.5));
        assert_eq!(coerce_price(&json!("-10")), None);
        assert_eq!(coerce_price(&json!("Rs. -10")), None);
        assert_eq!(coerce_price(&json!(-10)), None);
        assert_eq!(coerce_price(&json!("call for price")), None);
        assert_eq!(coerce_price(&json!(null)), None);
    }

    #[test]
    fn test_extract_json_from_plain_json() {
        let json = r#"{"key": "value"}"#;
        assert_eq!(extract_json(json).unwrap(), json);
    }

    #[test]
    fn test_extract_json_without_closing_fence() {
        let text = "```\n{\"key\": \"value\"}";
        assert_eq!(extract_json(text).unwrap(), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_empty_block() {
        assert!(extract_json("```").is_err());
    }
}
