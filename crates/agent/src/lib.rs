//! Browsing agent integration - task construction, execution, and result parsing
//!
//! This crate provides the upstream half of the pricecompare system - everything
//! between "a product query" and "a validated cheapest listing":
//! - Builds the natural-language browsing task for the regional search engine
//! - Drives an external browser-automation runner through an opaque capability trait
//! - Parses the agent's free-text output into a strongly validated record
//! - Guards the single shared browsing session and persists its cookies
//!
//! # Architecture
//!
//! A comparison follows a constrained pipeline:
//! 1. **Task Construction** (`task`) - Query → search URL → browsing instructions
//! 2. **Agent Execution** (`capability`, `runner`) - Instructions → step history
//! 3. **Result Parsing** (`parser`) - Step history → validated `CheapestItem`
//! 4. **Session Upkeep** (`session`) - Serialize runs, capture cookies best-effort
//!
//! # Key Types
//!
//! - `BrowsingAgent` - Pluggable capability trait over the automation runner
//! - `RunnerClient` - HTTP implementation against the runner sidecar
//! - `RunHistory` - Ordered step outcomes scanned for the terminal result
//! - `SessionGate` - Mutual exclusion for the one shared browser profile
//!
//! # Trust Principle
//!
//! The agent's output is LLM-mediated prose with no schema guarantee. Nothing
//! downstream touches it until the parser has either produced a validated
//! `CheapestItem` or a classified failure. There are no silent defaults.

pub mod capability;
pub mod history;
pub mod parser;
pub mod runner;
pub mod session;
pub mod task;

pub use capability::{BrowsingAgent, SessionCookies};
pub use history::{HistoryStep, RunHistory};
pub use parser::{parse_agent_result, ParseError};
pub use runner::RunnerClient;
pub use session::{CookieStore, SessionGate};
pub use task::{build_task, search_url};
