use crate::models::{Confidence, EstimationResult, ImageAnalysisResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

/// Lowest price worth listing; anything under it is lifted to this floor.
pub const MIN_PRICE: i64 = 10;
const MIN_PRICE_UPPER: i64 = 50;
const DEFAULT_REASONING: &str = "AI-based market analysis";

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("field `{field}` is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },
    #[error("field `{0}` holds a nested object")]
    Nested(String),
    #[error("record does not match schema: {0}")]
    Schema(String),
}

impl ValidationError {
    /// Shape problems, as opposed to a value that could not be coerced.
    pub fn is_structural(&self) -> bool {
        !matches!(self, ValidationError::NotNumeric { .. })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Integer view of a model-supplied number. `None` when absent or null.
fn coerce_int(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<i64>, ValidationError> {
    let not_numeric = |value: &Value| ValidationError::NotNumeric {
        field,
        value: value.to_string(),
    };
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('₹')
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            cleaned.parse::<i64>().ok().or_else(|| {
                cleaned
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| not_numeric(value))
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject(type_name(value)))
}

/// Normalizes a parsed price object into an [`EstimationResult`].
pub fn validate_price(value: &Value) -> Result<EstimationResult, ValidationError> {
    let obj = as_object(value)?;

    let mut predicted = coerce_int("predicted", obj.get("predicted"))?.unwrap_or(0);
    let mut lower = coerce_int("lower", obj.get("lower"))?
        .unwrap_or_else(|| predicted.saturating_mul(8) / 10);
    let mut upper = coerce_int("upper", obj.get("upper"))?
        .unwrap_or_else(|| predicted.saturating_mul(12) / 10);

    let confidence = obj
        .get("confidence")
        .and_then(Value::as_str)
        .map(Confidence::from_model)
        .unwrap_or(Confidence::High);
    let reasoning = obj
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_REASONING)
        .to_string();

    if predicted < MIN_PRICE {
        predicted = MIN_PRICE;
        lower = MIN_PRICE;
        upper = MIN_PRICE_UPPER;
    } else {
        lower = lower.clamp(0, predicted);
        upper = upper.max(predicted);
    }

    Ok(EstimationResult {
        predicted,
        lower,
        upper,
        confidence,
        reasoning,
    })
}

#[derive(Debug, Deserialize)]
struct RawImageRecord {
    title: String,
    description: String,
    category: String,
    condition: String,
    condition_reason: String,
    suggested_price_inr: Value,
    price_reasoning: String,
    is_legitimate: bool,
    legitimacy_score: Value,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    flag_reason: String,
}

/// Image records have no derived defaults, so any unusable number is a
/// schema mismatch rather than a coercion failure.
fn required_int(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    match coerce_int(field, Some(value)) {
        Ok(Some(parsed)) => Ok(parsed),
        Ok(None) => Err(ValidationError::Schema(format!("{field} is null"))),
        Err(err) => Err(ValidationError::Schema(err.to_string())),
    }
}

/// Checks a parsed image-analysis object against the flat record schema.
pub fn validate_image(value: Value) -> Result<ImageAnalysisResult, ValidationError> {
    let obj = as_object(&value)?;
    if let Some((key, _)) = obj.iter().find(|(_, v)| v.is_object()) {
        return Err(ValidationError::Nested(key.clone()));
    }

    let raw: RawImageRecord =
        serde_json::from_value(value).map_err(|err| ValidationError::Schema(err.to_string()))?;

    let price = required_int("suggested_price_inr", &raw.suggested_price_inr)?;
    let score = required_int("legitimacy_score", &raw.legitimacy_score)?;

    let mut seen = HashSet::new();
    let flags = raw
        .flags
        .into_iter()
        .map(|flag| flag.trim().to_string())
        .filter(|flag| !flag.is_empty() && seen.insert(flag.clone()))
        .collect();

    Ok(ImageAnalysisResult {
        title: raw.title,
        description: raw.description,
        category: raw.category,
        condition: raw.condition,
        condition_reason: raw.condition_reason,
        suggested_price_inr: price.max(0) as u64,
        price_reasoning: raw.price_reasoning,
        is_legitimate: raw.is_legitimate,
        legitimacy_score: score.clamp(0, 100) as u8,
        flags,
        flag_reason: raw.flag_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_bounds_are_derived_from_predicted() {
        let result = validate_price(&json!({"predicted": 1999})).unwrap();
        assert_eq!(result.predicted, 1999);
        assert_eq!(result.lower, 1599);
        assert_eq!(result.upper, 2398);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.reasoning, DEFAULT_REASONING);
    }

    #[test]
    fn floats_and_numeric_strings_are_coerced() {
        let result = validate_price(&json!({
            "predicted": "₹28,000",
            "lower": 25000.7,
            "upper": "32000",
            "confidence": "LOW",
            "reasoning": "Comparable OLX listings."
        }))
        .unwrap();
        assert_eq!((result.predicted, result.lower, result.upper), (28000, 25000, 32000));
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn tiny_prediction_hits_the_floor() {
        for predicted in [json!(3), json!(0), json!(-40)] {
            let result = validate_price(&json!({
                "predicted": predicted,
                "lower": 1,
                "upper": 5000
            }))
            .unwrap();
            assert_eq!((result.predicted, result.lower, result.upper), (10, 10, 50));
        }
    }

    #[test]
    fn bounds_are_ordered_around_predicted() {
        let result = validate_price(&json!({
            "predicted": 5000,
            "lower": 7000,
            "upper": 4000
        }))
        .unwrap();
        assert!(result.lower <= result.predicted && result.predicted <= result.upper);
        assert_eq!((result.lower, result.upper), (5000, 5000));

        let result = validate_price(&json!({"predicted": 500, "lower": -20})).unwrap();
        assert_eq!(result.lower, 0);
    }

    #[test]
    fn non_numeric_price_is_a_value_error() {
        let err = validate_price(&json!({"predicted": "about five hundred"})).unwrap_err();
        assert!(!err.is_structural());
        let err = validate_price(&json!({"predicted": true})).unwrap_err();
        assert!(matches!(err, ValidationError::NotNumeric { field: "predicted", .. }));
        let err = validate_price(&json!([1, 2, 3])).unwrap_err();
        assert!(err.is_structural());
    }

    fn image_record() -> Value {
        json!({
            "title": "Casio FX-991EX Calculator",
            "description": "Scientific calculator with cover.",
            "category": "Electronics",
            "condition": "Good",
            "condition_reason": "Light scratches on the case.",
            "suggested_price_inr": 850.0,
            "price_reasoning": "New units sell for about 1,400 on Amazon.",
            "is_legitimate": true,
            "legitimacy_score": 140,
            "flags": ["", "blurry", "blurry"],
        })
    }

    #[test]
    fn image_record_is_normalized() {
        let record = validate_image(image_record()).unwrap();
        assert_eq!(record.suggested_price_inr, 850);
        assert_eq!(record.legitimacy_score, 100);
        assert_eq!(record.flags, vec!["blurry".to_string()]);
        assert_eq!(record.flag_reason, "");
    }

    #[test]
    fn nested_or_incomplete_image_record_is_rejected() {
        let mut nested = image_record();
        nested["price"] = json!({"amount": 850});
        assert!(matches!(
            validate_image(nested),
            Err(ValidationError::Nested(key)) if key == "price"
        ));

        let mut missing = image_record();
        missing.as_object_mut().unwrap().remove("title");
        let err = validate_image(missing).unwrap_err();
        assert!(err.is_structural());

        let mut wrong_type = image_record();
        wrong_type["is_legitimate"] = json!("yes");
        assert!(validate_image(wrong_type).is_err());
    }

    #[test]
    fn non_numeric_image_numbers_are_schema_errors() {
        let mut record = image_record();
        record["legitimacy_score"] = json!("very high");
        let err = validate_image(record).unwrap_err();
        assert!(err.is_structural());
        assert!(matches!(err, ValidationError::Schema(_)));

        let mut record = image_record();
        record["suggested_price_inr"] = json!(null);
        assert!(validate_image(record).unwrap_err().is_structural());
    }
}
