//! Tool dispatch
//!
//! Maps an operation name plus argument bag onto a ledger call for the
//! authenticated tenant, and hands back the flat `{response, error}` payload.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::{LedgerError, TenantId};
use crate::store::Store;

use super::args::ToolArguments;
use super::command::{Command, CommandError};
use super::operation::Operation;

/// Hard dispatch failures.
///
/// Business refusals and bad arguments are not errors at this level; they
/// come back as a [`ToolResult`] with `error` set.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Store error: {0}")]
    Store(#[source] sqlx::Error),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Payload handed back to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub response: Value,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(response: Value) -> Self {
        Self {
            response,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            response: json!({}),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Dispatch by wire name; unknown names fail fast
pub async fn dispatch(
    store: &Store,
    tenant: TenantId,
    operation: &str,
    args: Value,
) -> Result<ToolResult, DispatchError> {
    let operation: Operation = operation
        .parse()
        .map_err(|_| DispatchError::UnknownOperation(operation.to_string()))?;

    match ToolArguments::from_value(args) {
        Ok(args) => dispatch_operation(store, tenant, operation, &args).await,
        Err(e) => Ok(reject(tenant, operation, e.to_string())),
    }
}

/// Dispatch an already-resolved operation
#[tracing::instrument(level = "debug", skip(store, args))]
pub async fn dispatch_operation(
    store: &Store,
    tenant: TenantId,
    operation: Operation,
    args: &ToolArguments,
) -> Result<ToolResult, DispatchError> {
    let command = match Command::parse(operation, args) {
        Ok(command) => command,
        Err(e) => return Ok(reject(tenant, operation, e.to_string())),
    };

    match command.execute(store, tenant).await {
        Ok(response) => {
            if operation.is_write() {
                tracing::info!(tenant_id = %tenant, %operation, "Tool call succeeded");
            } else {
                tracing::debug!(tenant_id = %tenant, %operation, "Tool call succeeded");
            }
            Ok(ToolResult::success(response))
        }
        Err(CommandError::Ledger(LedgerError::Store(e))) => {
            tracing::error!(tenant_id = %tenant, %operation, "Store failure during tool call: {}", e);
            Err(DispatchError::Store(e))
        }
        Err(CommandError::Ledger(e)) => Ok(reject(tenant, operation, e.to_string())),
        Err(CommandError::Serialization(e)) => Err(e.into()),
    }
}

fn reject(tenant: TenantId, operation: Operation, error: String) -> ToolResult {
    tracing::warn!(tenant_id = %tenant, %operation, "Tool call refused: {}", error);
    ToolResult::failure(error)
}

/// Tool call as emitted by an OpenAI-style chat completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded string or an inline object
    #[serde(default)]
    pub arguments: Value,
}

fn default_call_type() -> String {
    "function".to_string()
}

/// Message fed back to the agent for one tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub role: String,
    pub name: String,
    /// Serialized [`ToolResult`]
    pub content: String,
}

/// Execute a batch of tool calls in order.
///
/// Every tool name is resolved before the first call runs, so an unknown
/// tool rejects the batch without touching the ledger.
pub async fn run_tool_calls(
    store: &Store,
    tenant: TenantId,
    calls: &[ToolCall],
) -> Result<Vec<ToolOutput>, DispatchError> {
    let operations = calls
        .iter()
        .map(|call| {
            call.function
                .name
                .parse::<Operation>()
                .map_err(|_| DispatchError::UnknownOperation(call.function.name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut outputs = Vec::with_capacity(calls.len());

    for (call, operation) in calls.iter().zip(operations) {
        let args = match &call.function.arguments {
            Value::String(raw) => ToolArguments::from_json_str(raw),
            other => ToolArguments::from_value(other.clone()),
        };

        let result = match args {
            Ok(args) => dispatch_operation(store, tenant, operation, &args).await?,
            Err(e) => reject(tenant, operation, e.to_string()),
        };

        tracing::debug!(
            tool_call_id = %call.id,
            %operation,
            success = result.is_success(),
            "Tool call processed"
        );

        outputs.push(ToolOutput {
            tool_call_id: call.id.clone(),
            role: "tool".to_string(),
            name: call.function.name.clone(),
            content: serde_json::to_string(&result)?,
        });
    }

    Ok(outputs)
}
