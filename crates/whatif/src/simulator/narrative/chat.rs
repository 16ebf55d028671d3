use serde::{Deserialize, Serialize};

use super::{NarrativeError, Narrator, SYSTEM_PROMPT};
use crate::config::NarrativeConfig;
use crate::simulator::report::SimulationOutput;

const TEMPERATURE: f32 = 0.2;

/// Narrator backed by an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionsNarrator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for ChatCompletionsNarrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsNarrator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsNarrator {
    pub fn new(config: &NarrativeConfig, api_key: &str) -> Result<Self, NarrativeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| NarrativeError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.trim().to_string(),
            model: config.model.clone(),
        })
    }
}

impl Narrator for ChatCompletionsNarrator {
    async fn summarize(&self, output: &SimulationOutput) -> Result<String, NarrativeError> {
        let payload = serde_json::to_string(output)
            .map_err(|err| NarrativeError::Encoding(err.to_string()))?;
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &payload,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| NarrativeError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NarrativeError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|_| NarrativeError::MalformedResponse)?;

        extract_summary(body)
    }
}

fn extract_summary(body: ChatResponse) -> Result<String, NarrativeError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(NarrativeError::MalformedResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ChatResponse {
        serde_json::from_value(value).expect("response shape parses")
    }

    #[test]
    fn extracts_first_choice_trimmed() {
        let body = parse(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  If growth matters most, Act Now leads.\n" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }));
        assert_eq!(
            extract_summary(body).expect("summary present"),
            "If growth matters most, Act Now leads."
        );
    }

    #[test]
    fn empty_or_missing_choices_are_malformed() {
        assert!(matches!(
            extract_summary(parse(json!({ "choices": [] }))),
            Err(NarrativeError::MalformedResponse)
        ));
        assert!(matches!(
            extract_summary(parse(json!({ "choices": [{ "message": { "content": "   " } }] }))),
            Err(NarrativeError::MalformedResponse)
        ));
        assert!(matches!(
            extract_summary(parse(json!({}))),
            Err(NarrativeError::MalformedResponse)
        ));
    }

    #[test]
    fn request_carries_system_prompt_and_output() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "{}",
                },
            ],
            temperature: TEMPERATURE,
        };
        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "{}");
        assert_eq!(value["model"], "gpt-4o-mini");
    }
}
