//! Google AI Studio decision client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;
use tracing::instrument;

use common::TradeRecommendation;

use crate::parse::parse_decision_text;
use crate::types::{DecisionError, DecisionPayload, DecisionRequest, DecisionSource};

/// Decision-source settings, deserialized from the `[ai]` config section.
#[derive(Debug, Clone, Deserialize)]
pub struct AiStudioConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for AiStudioConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".into()
}

fn default_model() -> String {
    "gemini-pro".into()
}

fn default_temperature() -> f64 {
    0.1
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f64 {
    0.95
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

pub struct AiStudioClient {
    client: Client,
    config: AiStudioConfig,
    api_key: String,
}

impl AiStudioClient {
    pub fn new(config: AiStudioConfig, api_key: String) -> Result<Self, DecisionError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DecisionError::Api(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_prompt(request: &DecisionRequest) -> String {
        let schema = schemars::schema_for!(DecisionPayload);
        let schema_json =
            serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string());

        let snapshot = &request.snapshot;
        let features_json = serde_json::to_string_pretty(&request.features)
            .unwrap_or_else(|_| "{}".to_string());
        let risk_json =
            serde_json::to_string(&request.risk).unwrap_or_else(|_| "{}".to_string());

        format!(
            r#"You are an expert trading assistant analyzing Indian stock market data and must follow disciplined risk management rules.

Current Market Data:
- Symbol: {symbol} (Instrument ID: {instrument_id})
- Last Price: {last_price}
- Open: {open}
- High: {high}
- Low: {low}
- Volume: {volume}

Computed Market Features:
{features}

Current Net Position: {net_position}

Risk Profile:
{risk}

Provide a disciplined trade plan as a single JSON object conforming to the schema below.
Do NOT output markdown fences or conversational text. JUST the JSON object.
Only issue a BUY or SELL signal if confidence >= {min_confidence} and the risk profile allows it.

JSON Schema:
{schema}
"#,
            symbol = request.symbol.as_deref().unwrap_or("N/A"),
            instrument_id = request.instrument_id,
            last_price = snapshot.last_price,
            open = snapshot.open,
            high = snapshot.high,
            low = snapshot.low,
            volume = snapshot.volume,
            features = features_json,
            net_position = request.net_position,
            risk = risk_json,
            min_confidence = request.risk.min_confidence,
            schema = schema_json,
        )
    }

    fn extract_text(body: &serde_json::Value) -> Result<&str, DecisionError> {
        body.get("candidates")
            .and_then(|candidates| candidates.get(0))
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.get(0))
            .and_then(|part| part.get("text"))
            .and_then(|text| text.as_str())
            .ok_or(DecisionError::MissingContent)
    }

    async fn generate(&self, prompt: &str) -> Result<String, DecisionError> {
        let payload = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topK": self.config.top_k,
                "topP": self.config.top_p,
                "maxOutputTokens": self.config.max_tokens,
            },
        });

        let mut attempt = 0u32;
        loop {
            let send_result = self
                .client
                .post(self.endpoint())
                .header("content-type", "application/json")
                .header("x-goog-api-key", &self.api_key)
                .json(&payload)
                .send()
                .await;

            match send_result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        if status.as_u16() == 429 && attempt < self.config.max_retries {
                            attempt += 1;
                            sleep(Duration::from_millis(150 * u64::from(attempt))).await;
                            continue;
                        }
                        return Err(DecisionError::HttpStatus {
                            status: status.as_u16(),
                            body,
                        });
                    }

                    let body: serde_json::Value = response
                        .json()
                        .await
                        .map_err(|e| DecisionError::Api(e.to_string()))?;
                    return Ok(Self::extract_text(&body)?.to_string());
                }
                Err(e) => {
                    if attempt < self.config.max_retries {
                        attempt += 1;
                        sleep(Duration::from_millis(150 * u64::from(attempt))).await;
                        continue;
                    }
                    if e.is_timeout() {
                        return Err(DecisionError::Timeout);
                    }
                    return Err(DecisionError::Api(e.to_string()));
                }
            }
        }
    }
}

#[async_trait]
impl DecisionSource for AiStudioClient {
    #[instrument(skip(self, request), fields(request_id = %request.request_id))]
    async fn decide(
        &self,
        request: &DecisionRequest,
    ) -> Result<TradeRecommendation, DecisionError> {
        let prompt = Self::build_prompt(request);
        let text = self.generate(&prompt).await?;
        parse_decision_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::MarketSnapshot;
    use feature_engine::{extract_features, HistoryBuffer};
    use uuid::Uuid;

    fn request() -> DecisionRequest {
        let snapshot = MarketSnapshot {
            instrument_id: "1333".into(),
            symbol: Some("HDFC Bank".into()),
            last_price: 1600.0,
            open: 1550.0,
            high: 1650.0,
            low: 1540.0,
            volume: 5000.0,
            timestamp: Utc::now(),
        };
        let mut history = HistoryBuffer::default();
        history.push(snapshot.clone());
        let features = extract_features(&snapshot, &history);

        DecisionRequest {
            request_id: Uuid::new_v4(),
            instrument_id: "1333".into(),
            symbol: Some("HDFC Bank".into()),
            snapshot,
            features,
            net_position: 0.0,
            risk: crate::types::RiskSummary {
                min_confidence: 0.7,
                risk_per_trade: 0.02,
                max_position_size: 1000,
                stop_loss_percent: 0.05,
                take_profit_percent: 0.1,
                max_daily_trades: 10,
            },
        }
    }

    #[test]
    fn prompt_carries_market_data_and_schema() {
        let prompt = AiStudioClient::build_prompt(&request());
        assert!(prompt.contains("HDFC Bank"));
        assert!(prompt.contains("1600"));
        assert!(prompt.contains("confidence >= 0.7"));
        assert!(prompt.contains("JSON Schema"));
        assert!(prompt.contains("stop_loss"));
    }

    #[test]
    fn extracts_text_from_generate_content_response() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"action\": \"HOLD\"}"}]}
            }]
        });
        assert_eq!(
            AiStudioClient::extract_text(&body).unwrap(),
            "{\"action\": \"HOLD\"}"
        );

        let empty = serde_json::json!({"candidates": []});
        assert!(matches!(
            AiStudioClient::extract_text(&empty),
            Err(DecisionError::MissingContent)
        ));
    }
}
