use std::fs;
use std::path::Path;

use pricecompare_core::config::{AppConfig, LlmProvider, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_llm_credentials(&config));
            checks.push(check_cookie_store(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "llm_credential_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "cookie_store_writability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_llm_credentials(config: &AppConfig) -> DoctorCheck {
    let (status, details) = match config.llm.provider {
        LlmProvider::OpenAi | LlmProvider::Anthropic => {
            let expected_prefix =
                if config.llm.provider == LlmProvider::Anthropic { "sk-ant-" } else { "sk-" };
            let prefix_ok = config
                .llm
                .api_key
                .as_ref()
                .is_some_and(|key| key.expose_secret().trim().starts_with(expected_prefix));

            if prefix_ok {
                (
                    CheckStatus::Pass,
                    format!("api key carries the expected `{expected_prefix}` prefix"),
                )
            } else {
                (
                    CheckStatus::Fail,
                    format!(
                        "api key does not look like a {} credential (expected `{expected_prefix}` prefix)",
                        config.llm.provider.as_str()
                    ),
                )
            }
        }
        LlmProvider::Ollama => {
            let scheme_ok = config.llm.base_url.as_ref().is_some_and(|base_url| {
                let base_url = base_url.trim();
                base_url.starts_with("http://") || base_url.starts_with("https://")
            });

            if scheme_ok {
                (CheckStatus::Pass, "ollama base url has an http(s) scheme".to_string())
            } else {
                (
                    CheckStatus::Fail,
                    "ollama base url must start with http:// or https://".to_string(),
                )
            }
        }
    };

    DoctorCheck { name: "llm_credential_readiness", status, details }
}

fn check_cookie_store(config: &AppConfig) -> DoctorCheck {
    let directory = config
        .session
        .cookies_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let probe = directory.join(".pricecompare-doctor-probe");

    match fs::write(&probe, b"probe") {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            DoctorCheck {
                name: "cookie_store_writability",
                status: CheckStatus::Pass,
                details: format!("cookie directory `{}` is writable", directory.display()),
            }
        }
        Err(error) => DoctorCheck {
            name: "cookie_store_writability",
            status: CheckStatus::Fail,
            details: format!("cannot write to cookie directory `{}`: {error}", directory.display()),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
