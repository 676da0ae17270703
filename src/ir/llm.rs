//! LLM model/intent/config declarations. See spec.md §3 "LLM model / intent
//! / config".

use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmModel {
    pub name: String,
    pub provider: String,
    pub model_id: String,
    pub tier: String,
    pub max_tokens: Option<u32>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PiiAction {
    Redact,
    Warn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiPolicy {
    pub scan: bool,
    pub action: PiiAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: String,
    pub delays: Vec<Duration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmIntent {
    pub name: String,
    pub model: Option<String>,
    pub model_location: Option<Location>,
    pub prompt: String,
    pub output_schema: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub pii: PiiPolicy,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub default_model: Option<String>,
    pub artifact_store: Option<String>,
    pub logging_enabled: bool,
    pub rate_limits: BTreeMap<String, u32>,
    pub location: Location,
}
