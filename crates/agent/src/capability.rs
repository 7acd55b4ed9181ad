use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::history::RunHistory;

/// Opaque autonomous browsing capability. Implementations drive a browser and
/// a language model; callers depend only on the returned step history and
/// must not assume any output shape beyond it.
#[async_trait]
pub trait BrowsingAgent: Send + Sync {
    async fn run_task(&self, task: &str) -> Result<RunHistory>;
}

/// Read access to the shared browsing session's cookie jar.
#[async_trait]
pub trait SessionCookies: Send + Sync {
    /// Export the session's cookies as a JSON array.
    async fn read_cookies(&self) -> Result<Value>;
}
