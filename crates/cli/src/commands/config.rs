use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pricecompare_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["PRICECOMPARE_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["PRICECOMPARE_SERVER_PORT"]),
    ));
    lines.push(render_line(
        "server.health_check_port",
        &config.server.health_check_port.to_string(),
        source("server.health_check_port", &["PRICECOMPARE_SERVER_HEALTH_CHECK_PORT"]),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", &["PRICECOMPARE_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ));

    lines.push(render_line(
        "agent.base_url",
        &config.agent.base_url,
        source("agent.base_url", &["PRICECOMPARE_AGENT_BASE_URL"]),
    ));
    lines.push(render_line(
        "agent.timeout_secs",
        &config.agent.timeout_secs.to_string(),
        source("agent.timeout_secs", &["PRICECOMPARE_AGENT_TIMEOUT_SECS"]),
    ));

    lines.push(render_line(
        "llm.provider",
        config.llm.provider.as_str(),
        source("llm.provider", &["PRICECOMPARE_LLM_PROVIDER"]),
    ));
    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        source("llm.model", &["PRICECOMPARE_LLM_MODEL"]),
    ));
    lines.push(render_line(
        "llm.base_url",
        config.llm.base_url.as_deref().unwrap_or("<unset>"),
        source("llm.base_url", &["PRICECOMPARE_LLM_BASE_URL"]),
    ));
    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "llm.api_key",
        llm_api_key,
        source("llm.api_key", &["PRICECOMPARE_LLM_API_KEY"]),
    ));

    lines.push(render_line(
        "search.engine_url",
        &config.search.engine_url,
        source("search.engine_url", &["PRICECOMPARE_SEARCH_ENGINE_URL"]),
    ));
    lines.push(render_line(
        "search.country",
        &config.search.country,
        source("search.country", &["PRICECOMPARE_SEARCH_COUNTRY"]),
    ));
    lines.push(render_line(
        "search.language",
        &config.search.language,
        source("search.language", &["PRICECOMPARE_SEARCH_LANGUAGE"]),
    ));

    lines.push(render_line(
        "session.cookies_file",
        &config.session.cookies_file.display().to_string(),
        source("session.cookies_file", &["PRICECOMPARE_SESSION_COOKIES_FILE"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["PRICECOMPARE_LOGGING_LEVEL", "PRICECOMPARE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["PRICECOMPARE_LOGGING_FORMAT", "PRICECOMPARE_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("pricecompare.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/pricecompare.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    for env_key in env_keys {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
