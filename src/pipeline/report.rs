use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::Vars;

/// Execution mode, decided once per invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// Compose the request and stop: no network call, no write.
    Planning,
    #[default]
    Executing,
}

impl Mode {
    pub fn from_plan_only(plan_only: bool) -> Self {
        if plan_only { Mode::Planning } else { Mode::Executing }
    }
}

/// Observable outcome of one connector invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    changed: bool,
    /// 0 when no network call was made.
    status_code: u16,
    /// Empty when nothing was written.
    artifact_path: String,
    request_url: String,
    payload: Value,
    /// Connector-specific echoes.
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    details: Vars,
}

impl OperationResult {
    /// Result of a plan-only run.
    pub fn planned(
        request_url: String,
        details: Vars,
    ) -> Self {
        Self {
            changed: false,
            status_code: 0,
            artifact_path: String::new(),
            request_url,
            payload: Value::Null,
            details,
        }
    }

    /// Result of a run that reached the upstream.
    pub fn executed(
        request_url: String,
        status_code: u16,
        payload: Value,
        artifact_path: Option<String>,
        details: Vars,
    ) -> Self {
        Self {
            changed: artifact_path.is_some(),
            status_code,
            artifact_path: artifact_path.unwrap_or_default(),
            request_url,
            payload,
            details,
        }
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn artifact_path(&self) -> &str {
        &self.artifact_path
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn details(&self) -> &Vars {
        &self.details
    }
}
