use knowledge_ox_common::{Endpoint, HttpMethod};
use serde::Serialize;
use serde_json::Value;

use crate::extract::response_text;
use crate::{ApiResult, ChatMessage, ClientError, KnowledgeClient, Role, Settings};

/// Request body for the Responses API with file search attached
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub tools: Vec<ResponsesTool>,
}

/// One conversation turn as sent to the remote
#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    InputText { text: String },
    OutputText { text: String },
}

/// Tools available to the model
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsesTool {
    FileSearch { vector_store_ids: Vec<String> },
}

impl InputMessage {
    /// Assistant turns replay as model output, everything else as input
    pub fn from_turn(role: Role, text: impl Into<String>) -> Self {
        let text = text.into();
        let block = match role {
            Role::Assistant => ContentBlock::OutputText { text },
            Role::User | Role::System => ContentBlock::InputText { text },
        };
        Self {
            role,
            content: vec![block],
        }
    }
}

impl ResponsesRequest {
    /// Full history followed by the new question, searching one vector store
    pub fn retrieval(
        model: impl Into<String>,
        history: &[ChatMessage],
        question: &str,
        vector_store_id: &str,
    ) -> Self {
        let input = history
            .iter()
            .map(|message| InputMessage::from_turn(message.role, message.content.as_str()))
            .chain(std::iter::once(InputMessage::from_turn(Role::User, question)))
            .collect();

        Self {
            model: model.into(),
            input,
            tools: vec![ResponsesTool::FileSearch {
                vector_store_ids: vec![vector_store_id.to_string()],
            }],
        }
    }
}

impl KnowledgeClient {
    /// Ask a question grounded in the configured vector store.
    ///
    /// `history` is the caller's conversation so far; it is sent in full
    /// and never modified. The answer comes back as a new assistant message.
    pub async fn ask(
        &self,
        question: &str,
        history: &[ChatMessage],
        settings: &Settings,
    ) -> ApiResult<ChatMessage> {
        self.try_ask(question, history, settings).await.into()
    }

    async fn try_ask(
        &self,
        question: &str,
        history: &[ChatMessage],
        settings: &Settings,
    ) -> Result<ChatMessage, ClientError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ClientError::EmptyQuestion);
        }
        let store_id = self.require_store(settings)?;

        let request =
            ResponsesRequest::retrieval(settings.effective_model(), history, question, store_id);
        let response: Value = self
            .requests(settings)
            .request_json(&Endpoint::new("responses", HttpMethod::Post), Some(&request))
            .await?;

        Ok(self.answer_from(&response))
    }

    /// Assistant message for a response body
    pub(crate) fn answer_from(&self, response: &Value) -> ChatMessage {
        let id = response
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
            .map_or_else(|| self.ids().next_id(), ToString::to_string);

        ChatMessage::new(
            id,
            Role::Assistant,
            response_text(response),
            self.clock().now_millis(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Clock, IdGenerator};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug)]
    struct FixedClock;

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            1_700_000_000_123
        }
    }

    #[derive(Debug)]
    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn next_id(&self) -> String {
            "local-1".to_string()
        }
    }

    fn client() -> KnowledgeClient {
        KnowledgeClient::builder()
            .clock(Arc::new(FixedClock))
            .ids(Arc::new(FixedIds))
            .build()
    }

    #[test]
    fn request_replays_history_then_question() {
        let history = vec![
            ChatMessage::new("1", Role::System, "Be brief.", 1),
            ChatMessage::new("2", Role::User, "Capital of France?", 2),
            ChatMessage::new("3", Role::Assistant, "Paris", 3),
        ];

        let request = ResponsesRequest::retrieval("gpt-4o-mini", &history, "And Italy?", "vs_1");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "input": [
                    {"role": "system", "content": [{"type": "input_text", "text": "Be brief."}]},
                    {"role": "user", "content": [{"type": "input_text", "text": "Capital of France?"}]},
                    {"role": "assistant", "content": [{"type": "output_text", "text": "Paris"}]},
                    {"role": "user", "content": [{"type": "input_text", "text": "And Italy?"}]}
                ],
                "tools": [{"type": "file_search", "vector_store_ids": ["vs_1"]}]
            })
        );
    }

    #[test]
    fn answer_uses_remote_id_when_present() {
        let answer = client().answer_from(&json!({"id": "resp_1", "output_text": "Lyon"}));
        assert_eq!(answer.id, "resp_1");
        assert_eq!(answer.role, Role::Assistant);
        assert_eq!(answer.content, "Lyon");
        assert_eq!(answer.created_at, 1_700_000_000_123);
    }

    #[test]
    fn answer_without_remote_id_gets_a_generated_one() {
        let answer = client().answer_from(&json!({"foo": 1}));
        assert_eq!(answer.id, "local-1");
        assert_eq!(answer.content, "No response");
    }
}
