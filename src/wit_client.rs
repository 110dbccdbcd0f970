use std::collections::HashMap;
use std::env;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{eyre, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::error::ApiError;

const SERVICE: &str = "wit.ai";
const DEFAULT_WIT_API_URL: &str = "https://api.wit.ai/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One extracted value for an entity. Wit reports numbers as JSON numbers and
/// names as JSON strings; both are kept as-is until a caller asks for a
/// concrete type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityValue {
    #[serde(default)]
    pub value: Value,
}

/// The per-turn result of intent classification.
///
/// Entity keys are normalized from the wire form `"<namespace>:<key>"` down
/// to the bare `<key>`, so `wit$number:number` is looked up as `number`.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub intent: Option<String>,
    pub entities: HashMap<String, Vec<EntityValue>>,
}

impl Classification {
    /// First value of `key` interpreted as a count. Wit may deliver counts as
    /// integers, floats, or digit strings.
    pub fn first_entity_count(&self, key: &str) -> Option<u32> {
        let value = &self.entities.get(key)?.first()?.value;
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().map(|f| f as u64))
                .and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// First value of `key` as text.
    pub fn first_entity_text(&self, key: &str) -> Option<String> {
        match &self.entities.get(key)?.first()?.value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Classifies a raw utterance into an intent plus entities.
#[async_trait]
pub trait NluClient {
    async fn classify(&self, utterance: &str) -> Result<Classification, ApiError>;
}

#[derive(Debug, Deserialize)]
struct WitResponse {
    #[serde(default)]
    intents: Vec<WitIntent>,
    #[serde(default)]
    entities: HashMap<String, Vec<EntityValue>>,
}

#[derive(Debug, Deserialize)]
struct WitIntent {
    name: String,
}

fn normalize(response: WitResponse) -> Classification {
    let intent = response.intents.into_iter().next().map(|i| i.name);
    let entities = response
        .entities
        .into_iter()
        .map(|(key, values)| {
            let short = key.rsplit(':').next().unwrap_or(&key).to_string();
            (short, values)
        })
        .collect();
    Classification { intent, entities }
}

pub struct WitClient {
    access_token: String,
    message_url: Url,
    client: reqwest::Client,
}

impl WitClient {
    pub fn new() -> Result<Self> {
        let access_token = env::var("WIT_ACCESS_TOKEN")
            .map_err(|_| eyre!("WIT_ACCESS_TOKEN environment variable not set"))?;

        let mut base = env::var("WIT_API_URL").unwrap_or_else(|_| DEFAULT_WIT_API_URL.to_string());
        if !base.ends_with('/') {
            base.push('/');
        }
        let message_url = Url::parse(&base)?.join("message")?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            access_token,
            message_url,
            client,
        })
    }
}

#[async_trait]
impl NluClient for WitClient {
    async fn classify(&self, utterance: &str) -> Result<Classification, ApiError> {
        debug!("Classifying utterance with wit.ai: {}", utterance);

        let response = self
            .client
            .get(self.message_url.clone())
            .bearer_auth(&self.access_token)
            .query(&[("q", utterance)])
            .send()
            .await
            .map_err(|source| ApiError::Http {
                service: SERVICE,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("wit.ai request failed with status {}: {}", status, body);
            return Err(ApiError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        let payload: WitResponse = response.json().await.map_err(|e| ApiError::Malformed {
            service: SERVICE,
            reason: e.to_string(),
        })?;

        let classification = normalize(payload);
        debug!("Classified intent: {:?}", classification.intent);
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify_fixture(value: Value) -> Classification {
        let response: WitResponse = serde_json::from_value(value).expect("fixture deserializes");
        normalize(response)
    }

    #[test]
    fn top_ranked_intent_is_taken() {
        let classification = classify_fixture(json!({
            "intents": [{"name": "get_messages"}, {"name": "get_help"}],
            "entities": {}
        }));
        assert_eq!(classification.intent.as_deref(), Some("get_messages"));
    }

    #[test]
    fn missing_intents_yield_no_intent() {
        let classification = classify_fixture(json!({"entities": {}}));
        assert_eq!(classification.intent, None);

        let classification = classify_fixture(json!({"intents": [], "entities": {}}));
        assert_eq!(classification.intent, None);
    }

    #[test]
    fn entity_keys_are_normalized_to_the_trailing_segment() {
        let classification = classify_fixture(json!({
            "intents": [{"name": "get_messages"}],
            "entities": {
                "wit$number:number": [{"value": 3}],
                "chatroom_name:chatroom_name": [{"value": "wisc"}]
            }
        }));
        assert_eq!(classification.first_entity_count("number"), Some(3));
        assert_eq!(
            classification.first_entity_text("chatroom_name").as_deref(),
            Some("wisc")
        );
    }

    #[test]
    fn counts_parse_from_floats_and_strings() {
        let classification = classify_fixture(json!({
            "intents": [],
            "entities": {"wit$number:number": [{"value": 5.0}]}
        }));
        assert_eq!(classification.first_entity_count("number"), Some(5));

        let classification = classify_fixture(json!({
            "intents": [],
            "entities": {"wit$number:number": [{"value": "7"}]}
        }));
        assert_eq!(classification.first_entity_count("number"), Some(7));
    }

    #[test]
    fn absent_entities_return_none() {
        let classification = classify_fixture(json!({"intents": [], "entities": {}}));
        assert_eq!(classification.first_entity_count("number"), None);
        assert_eq!(classification.first_entity_text("chatroom_name"), None);
    }

    #[test]
    fn first_of_several_entity_values_wins() {
        let classification = classify_fixture(json!({
            "intents": [],
            "entities": {"chatroom_name:chatroom_name": [
                {"value": "memes"}, {"value": "wisc"}
            ]}
        }));
        assert_eq!(
            classification.first_entity_text("chatroom_name").as_deref(),
            Some("memes")
        );
    }
}
