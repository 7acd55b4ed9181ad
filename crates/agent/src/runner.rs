//! HTTP client for the browser-automation runner sidecar. The runner owns
//! the real browser profile and the LLM loop; this client hands it a task
//! plus LLM settings and gets back the step history.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

use pricecompare_core::config::{AgentConfig, LlmConfig};

use crate::capability::{BrowsingAgent, SessionCookies};
use crate::history::RunHistory;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct RunnerClient {
    client: Client,
    base_url: String,
    llm: LlmConfig,
}

// No Debug derives here: the serialized settings hold the exposed api key.
#[derive(Serialize)]
struct TaskRequest<'a> {
    task: &'a str,
    llm: LlmSettings<'a>,
}

#[derive(Serialize)]
struct LlmSettings<'a> {
    provider: &'static str,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

impl RunnerClient {
    /// Build a client for the runner at `agent.base_url`. The request timeout
    /// covers the whole browsing run, which routinely takes minutes.
    pub fn new(agent: &AgentConfig, llm: &LlmConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(agent.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: agent.base_url.trim_end_matches('/').to_string(),
            llm: llm.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the runner's own health endpoint.
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        self.client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .context("browsing runner is unreachable")?
            .error_for_status()
            .context("browsing runner reported an unhealthy status")?;
        Ok(())
    }

    fn llm_settings(&self) -> LlmSettings<'_> {
        LlmSettings {
            provider: self.llm.provider.as_str(),
            model: &self.llm.model,
            base_url: self.llm.base_url.as_deref(),
            api_key: self.llm.api_key.as_ref().map(|key| key.expose_secret().to_string()),
        }
    }
}

#[async_trait]
impl BrowsingAgent for RunnerClient {
    async fn run_task(&self, task: &str) -> Result<RunHistory> {
        let url = format!("{}/tasks", self.base_url);
        let request = TaskRequest { task, llm: self.llm_settings() };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("browsing runner request failed")?
            .error_for_status()
            .context("browsing runner rejected the task")?;

        let history: RunHistory =
            response.json().await.context("browsing runner returned an unreadable task response")?;

        Ok(history)
    }
}

#[async_trait]
impl SessionCookies for RunnerClient {
    async fn read_cookies(&self) -> Result<Value> {
        let url = format!("{}/session/cookies", self.base_url);
        let cookies = self
            .client
            .get(&url)
            .send()
            .await
            .context("cookie export request failed")?
            .error_for_status()
            .context("cookie export was rejected by the runner")?
            .json::<Value>()
            .await
            .context("cookie export returned invalid JSON")?;

        Ok(cookies)
    }
}

#[cfg(test)]
mod tests {
    use pricecompare_core::config::{AgentConfig, LlmConfig, LlmProvider};

    use super::{RunnerClient, TaskRequest};

    fn client_fixture(base_url: &str) -> RunnerClient {
        let agent = AgentConfig { base_url: base_url.to_string(), timeout_secs: 30 };
        let llm = LlmConfig {
            provider: LlmProvider::OpenAi,
            api_key: Some("sk-test".to_string().into()),
            base_url: None,
            model: "gpt-4o".to_string(),
        };
        RunnerClient::new(&agent, &llm).expect("client should build")
    }

    #[test]
    fn trailing_slash_in_base_url_is_normalized() {
        let client = client_fixture("http://127.0.0.1:9000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn task_request_serializes_llm_settings() {
        let client = client_fixture("http://127.0.0.1:9000");
        let request = TaskRequest { task: "browse", llm: client.llm_settings() };

        let rendered = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(rendered["task"], "browse");
        assert_eq!(rendered["llm"]["provider"], "openai");
        assert_eq!(rendered["llm"]["model"], "gpt-4o");
        assert_eq!(rendered["llm"]["api_key"], "sk-test");
        assert!(rendered["llm"].get("base_url").is_none());
    }

    #[test]
    fn ollama_settings_carry_base_url_without_api_key() {
        let agent = AgentConfig { base_url: "http://127.0.0.1:9000".to_string(), timeout_secs: 30 };
        let llm = LlmConfig {
            provider: LlmProvider::Ollama,
            api_key: None,
            base_url: Some("http://localhost:11434".to_string()),
            model: "llama3.1".to_string(),
        };
        let client = RunnerClient::new(&agent, &llm).expect("client should build");
        let settings =
            serde_json::to_value(client.llm_settings()).expect("settings should serialize");

        assert_eq!(settings["provider"], "ollama");
        assert_eq!(settings["base_url"], "http://localhost:11434");
        assert!(settings.get("api_key").is_none());
    }
}
