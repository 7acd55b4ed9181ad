pub mod config;
pub mod domain;
pub mod errors;
pub mod price;
pub mod suggestion;

pub use config::{
    AgentConfig, AppConfig, ConfigError, ConfigOverrides, LlmConfig, LlmProvider, LoadOptions,
    LogFormat, LoggingConfig, SearchConfig, ServerConfig, SessionConfig,
};
pub use domain::{CheapestItem, ComparisonRequest, ComparisonResult, HufAmount, PriceValue};
pub use errors::CompareError;
pub use price::{format_huf, normalize, NormalizeError};
pub use suggestion::{percent_difference, suggest, DEGENERATE_ADVISORY};
