//! Optional prose layer over a finished simulation.
//!
//! A narrator only ever sees the engine output. Its failures are absorbed by the service and
//! never alter the computed scenarios.

mod chat;

pub use chat::ChatCompletionsNarrator;

use std::future::Future;

use crate::config::NarrativeConfig;
use crate::simulator::report::SimulationOutput;

/// Instructions sent alongside every summary request.
pub const SYSTEM_PROMPT: &str = "You are writing a concise executive explanation of decision scenarios. \
STRICT RULES: Use ONLY the provided JSON. Do not invent outcomes. \
Do not predict the future. Do not tell the user what to do. \
You may say 'If X matters most…' and describe tradeoffs. \
Output under 140 words.";

/// Capability turning a simulation output into a short prose summary.
pub trait Narrator: Send + Sync {
    fn summarize(
        &self,
        output: &SimulationOutput,
    ) -> impl Future<Output = Result<String, NarrativeError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative generation is not configured")]
    Disabled,
    #[error("could not encode simulation output: {0}")]
    Encoding(String),
    #[error("narrative transport failed: {0}")]
    Transport(String),
    #[error("narrative service responded with status {0}")]
    Status(u16),
    #[error("narrative service returned an unusable response")]
    MalformedResponse,
    #[error("narrative generation timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Narrator used when no credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNarrator;

impl Narrator for DisabledNarrator {
    async fn summarize(&self, _output: &SimulationOutput) -> Result<String, NarrativeError> {
        Err(NarrativeError::Disabled)
    }
}

/// Narrator selected from configuration at startup.
#[derive(Debug)]
pub enum ConfiguredNarrator {
    Disabled(DisabledNarrator),
    ChatCompletions(ChatCompletionsNarrator),
}

impl ConfiguredNarrator {
    pub fn from_config(config: &NarrativeConfig) -> Result<Self, NarrativeError> {
        match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(Self::ChatCompletions(
                ChatCompletionsNarrator::new(config, key)?,
            )),
            _ => Ok(Self::Disabled(DisabledNarrator)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::ChatCompletions(_))
    }
}

impl Narrator for ConfiguredNarrator {
    async fn summarize(&self, output: &SimulationOutput) -> Result<String, NarrativeError> {
        match self {
            Self::Disabled(narrator) => narrator.summarize(output).await,
            Self::ChatCompletions(narrator) => narrator.summarize(output).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(api_key: Option<&str>) -> NarrativeConfig {
        NarrativeConfig {
            api_key: api_key.map(str::to_string),
            model: "gpt-4o-mini".to_string(),
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn missing_or_blank_key_disables_narrator() {
        let narrator = ConfiguredNarrator::from_config(&config(None)).expect("builds");
        assert!(!narrator.is_enabled());

        let narrator = ConfiguredNarrator::from_config(&config(Some("  "))).expect("builds");
        assert!(!narrator.is_enabled());
    }

    #[test]
    fn api_key_enables_chat_completions() {
        let narrator = ConfiguredNarrator::from_config(&config(Some("sk-test"))).expect("builds");
        assert!(narrator.is_enabled());
    }

    #[tokio::test]
    async fn disabled_narrator_reports_disabled() {
        let output = crate::simulator::engine::ScenarioEngine::standard()
            .compute(&crate::simulator::demo::demo_request().input());
        let result = DisabledNarrator.summarize(&output).await;
        assert!(matches!(result, Err(NarrativeError::Disabled)));
    }
}
