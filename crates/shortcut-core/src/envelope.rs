//! Response envelope returned by every remote-callable operation

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Display;
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }

    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error.unwrap_or_default())
        }
    }
}

impl<T: Serialize> CommandResult<T> {
    /// JSON form sent across the process boundary
    pub fn into_value(self) -> Value {
        match serde_json::to_value(&self) {
            Ok(value) => value,
            Err(e) => json!({
                "success": false,
                "error": format!("Failed to serialize response: {e}"),
            }),
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for CommandResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Run an operation and fold its outcome into an envelope
pub async fn wrap<T, E, F>(operation: F) -> CommandResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match operation.await {
        Ok(data) => CommandResult::ok(data),
        Err(e) => {
            tracing::warn!(error = %e, "Operation failed");
            CommandResult::err(e.to_string())
        }
    }
}
