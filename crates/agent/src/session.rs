//! Shared-session discipline. The runner keeps exactly one browser profile,
//! so concurrent comparisons must serialize on it, and its cookies are worth
//! persisting across restarts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

/// Mutual exclusion gate for the shared browsing session. Held for the full
/// agent run plus cookie capture, so at most one comparison is in flight.
#[derive(Clone, Default)]
pub struct SessionGate {
    inner: Arc<Mutex<()>>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}

/// Best-effort persistence for exported session cookies. Failures are logged
/// and never propagate; cookie reuse is a durability aid for the browsing
/// session, not part of the response contract.
#[derive(Clone, Debug)]
pub struct CookieStore {
    path: PathBuf,
}

impl CookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn persist(&self, cookies: &Value, correlation_id: &str) {
        let cookie_count = cookies.as_array().map(Vec::len).unwrap_or(0);
        let rendered = match serde_json::to_string_pretty(cookies) {
            Ok(rendered) => rendered,
            Err(error) => {
                warn!(
                    event_name = "session.cookies.encode_failed",
                    correlation_id,
                    error = %error,
                    "could not encode session cookies"
                );
                return;
            }
        };

        match tokio::fs::write(&self.path, rendered).await {
            Ok(()) => {
                info!(
                    event_name = "session.cookies.saved",
                    correlation_id,
                    path = %self.path.display(),
                    cookie_count,
                    "session cookies saved"
                );
            }
            Err(error) => {
                warn!(
                    event_name = "session.cookies.save_failed",
                    correlation_id,
                    path = %self.path.display(),
                    error = %error,
                    "could not save session cookies"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::{CookieStore, SessionGate};

    #[tokio::test]
    async fn gate_admits_one_holder_at_a_time() {
        let gate = SessionGate::new();

        let guard = gate.acquire().await;
        assert!(gate.inner.try_lock().is_err(), "gate should be closed while held");

        drop(guard);
        assert!(gate.inner.try_lock().is_ok(), "gate should reopen after release");
    }

    #[tokio::test]
    async fn persist_writes_a_pretty_printed_cookie_array() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("google_cookies.json");
        let store = CookieStore::new(&path);

        let cookies = json!([{"name": "NID", "value": "abc", "domain": ".google.hu"}]);
        store.persist(&cookies, "test").await;

        let written = std::fs::read_to_string(&path).expect("cookie file should exist");
        assert!(written.contains("\"name\": \"NID\""));
        assert!(written.contains('\n'), "output should be indented");

        let round_trip: serde_json::Value =
            serde_json::from_str(&written).expect("cookie file should be valid JSON");
        assert_eq!(round_trip.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn persist_swallows_write_failures() {
        let store = CookieStore::new("/nonexistent-dir/cookies.json");
        store.persist(&json!([]), "test").await;
    }
}
