//! Technology topic normalization
//!
//! Turns a free-form question into a canonical lowercase topic via the
//! model's structured-output mode, so "who supports Angular apps?" seeds
//! `lookup_contact(area="angular")`. Every failure is swallowed; the caller
//! falls back to the normal loop.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::provider::{ChatMessage, ModelClient};

/// Schema name sent to the provider
const SCHEMA_NAME: &str = "tech_topic";

/// Extraction result; only `topic` is required by the schema
#[derive(Debug, Clone, Deserialize)]
pub struct TopicExtraction {
    pub topic: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn topic_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "topic": {
                "type": "string",
                "description": "canonical technology/topic in lowercase, e.g., 'angular', 'java spring boot', 'postgresql'"
            },
            "synonyms": {"type": "array", "items": {"type": "string"}},
            "category": {
                "type": "string",
                "description": "frontend/backend/devops/database/security/it"
            }
        },
        "required": ["topic"]
    })
}

/// Best-effort topic extraction; `None` on any failure
pub async fn extract_topic(model: &dyn ModelClient, question: &str) -> Option<TopicExtraction> {
    let messages = [
        ChatMessage::system("Extract the main technology/topic from the user question."),
        ChatMessage::user(question),
    ];

    let value = match model
        .complete_structured(&messages, SCHEMA_NAME, topic_schema())
        .await
    {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "topic extraction call failed");
            return None;
        }
    };

    match serde_json::from_value::<TopicExtraction>(value) {
        Ok(extraction) if !extraction.topic.trim().is_empty() => Some(extraction),
        Ok(_) => {
            debug!("topic extraction returned an empty topic");
            None
        }
        Err(e) => {
            debug!(error = %e, "topic extraction returned unexpected shape");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockModel;

    #[tokio::test]
    async fn extracts_topic_from_structured_reply() {
        let mock = MockModel::new();
        mock.push_structured(Ok(json!({
            "topic": "java spring boot",
            "synonyms": ["spring", "spring boot"],
            "category": "backend"
        })));

        let extraction = extract_topic(&mock, "Who supports Java Spring Boot?")
            .await
            .unwrap();
        assert_eq!(extraction.topic, "java spring boot");
        assert_eq!(extraction.synonyms.len(), 2);
    }

    #[tokio::test]
    async fn failures_yield_none() {
        let mock = MockModel::new();
        mock.push_structured(Err("model unavailable".to_string()));
        assert!(extract_topic(&mock, "who supports angular?").await.is_none());

        let bad_shape = MockModel::new();
        bad_shape.push_structured(Ok(json!({"category": "backend"})));
        assert!(extract_topic(&bad_shape, "who supports angular?").await.is_none());

        let empty_topic = MockModel::new();
        empty_topic.push_structured(Ok(json!({"topic": "  "})));
        assert!(extract_topic(&empty_topic, "who supports angular?").await.is_none());
    }
}
