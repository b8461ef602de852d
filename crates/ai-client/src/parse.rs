//! Fallible parse of free-form decision text into the canonical form.

use common::{Action, TradeRecommendation};

use crate::types::{DecisionError, DecisionPayload};

/// Extract the JSON object embedded in decision text and normalize it.
///
/// Model output often wraps the object in code fences or prose; everything
/// outside the outermost braces is discarded. Failure is a typed error so
/// the caller can choose the HOLD default explicitly.
pub fn parse_decision_text(text: &str) -> Result<TradeRecommendation, DecisionError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let start = cleaned.find('{').ok_or(DecisionError::MissingJson)?;
    let end = cleaned.rfind('}').map(|i| i + 1).ok_or(DecisionError::MissingJson)?;
    if end <= start {
        return Err(DecisionError::MissingJson);
    }

    let payload: DecisionPayload = serde_json::from_str(&cleaned[start..end])?;
    Ok(normalize_payload(payload))
}

/// Clamp an arbitrary payload into the canonical in-range recommendation.
///
/// Unknown actions become HOLD; confidence clamps to [0, 1]; quantity floors
/// at zero; non-finite levels are dropped.
pub fn normalize_payload(payload: DecisionPayload) -> TradeRecommendation {
    let action = match payload.action.trim().to_ascii_uppercase().as_str() {
        "BUY" => Action::Buy,
        "SELL" => Action::Sell,
        _ => Action::Hold,
    };

    let confidence = if payload.confidence.is_finite() {
        payload.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let quantity = if payload.quantity.is_finite() {
        payload.quantity.max(0.0) as i64
    } else {
        0
    };

    TradeRecommendation {
        action,
        confidence,
        quantity,
        reasoning: payload.reasoning.trim().to_string(),
        stop_loss: payload.stop_loss.filter(|level| level.is_finite()),
        take_profit: payload.take_profit.filter(|level| level.is_finite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json() {
        let text = r#"Here is the plan:
```json
{"action": "buy", "confidence": 0.82, "quantity": 25, "reasoning": "trend up", "stop_loss": 0.05}
```"#;
        let rec = parse_decision_text(text).unwrap();
        assert_eq!(rec.action, Action::Buy);
        assert_eq!(rec.confidence, 0.82);
        assert_eq!(rec.quantity, 25);
        assert_eq!(rec.stop_loss, Some(0.05));
    }

    #[test]
    fn missing_object_is_a_typed_error() {
        assert!(matches!(
            parse_decision_text("no structured content here"),
            Err(DecisionError::MissingJson)
        ));
        // closing brace before any opening brace
        assert!(matches!(
            parse_decision_text("} oops {"),
            Err(DecisionError::MissingJson)
        ));
    }

    #[test]
    fn invalid_json_is_a_typed_error() {
        assert!(matches!(
            parse_decision_text("{action: BUY}"),
            Err(DecisionError::Json(_))
        ));
    }

    #[test]
    fn unknown_action_becomes_hold() {
        let rec = parse_decision_text(r#"{"action": "SHORT", "confidence": 0.9}"#).unwrap();
        assert_eq!(rec.action, Action::Hold);
    }

    #[test]
    fn out_of_range_fields_are_clamped() {
        let payload = DecisionPayload {
            action: "BUY".into(),
            confidence: 1.7,
            quantity: -40.0,
            reasoning: "  padded  ".into(),
            stop_loss: Some(f64::NAN),
            take_profit: Some(1700.0),
        };
        let rec = normalize_payload(payload);
        assert_eq!(rec.confidence, 1.0);
        assert_eq!(rec.quantity, 0);
        assert_eq!(rec.reasoning, "padded");
        assert_eq!(rec.stop_loss, None);
        assert_eq!(rec.take_profit, Some(1700.0));
    }

    #[test]
    fn missing_fields_default_safely() {
        let rec = parse_decision_text("{}").unwrap();
        assert_eq!(rec.action, Action::Hold);
        assert_eq!(rec.confidence, 0.0);
        assert_eq!(rec.quantity, 0);
    }
}
