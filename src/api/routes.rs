//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::domain::{AccountRef, Amount, RequestContext};
use crate::error::{AppError, AppResult};
use crate::ledger::{
    self, AccountCreated, AccountList, AccountRemoved, BalanceReport, TransactionHistory,
    TransferReceipt,
};
use crate::store::Store;
use crate::tools::{self, ToolCall, ToolOutput, ToolResult};

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
}

/// Deposit or withdrawal body; `amount` may be a number or a string
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub amount: Value,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from: AccountRef,
    pub to: AccountRef,
    pub amount: Value,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCallsRequest {
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Serialize)]
pub struct ToolCallsResponse {
    pub tool_outputs: Vec<ToolOutput>,
}

fn parse_amount(value: &Value) -> AppResult<Amount> {
    match value {
        Value::Number(n) => Ok(Amount::try_from(n)?),
        Value::String(s) => Ok(Amount::from_str(s)?),
        _ => Err(AppError::InvalidRequest(
            "amount must be a number or a numeric string".to_string(),
        )),
    }
}

/// Tool arguments body: empty means no arguments, anything else must be JSON
fn tool_arguments_body(body: &[u8]) -> AppResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidRequest(format!("Malformed JSON body: {}", e)))
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<Store> {
    Router::new()
        // Accounts
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/:account", delete(remove_account))
        .route("/accounts/:account/balance", get(get_balance))
        .route("/accounts/:account/transactions", get(get_transactions))
        // Movements
        .route("/accounts/:account/deposits", post(add_money))
        .route("/accounts/:account/withdrawals", post(withdraw_money))
        .route("/transfers", post(transfer_money))
        // Agent tools
        .route("/tools", get(list_tools))
        .route("/tools/:operation", post(invoke_tool))
        .route("/tool-calls", post(run_tool_calls))
}

// =========================================================================
// Accounts
// =========================================================================

/// GET /accounts
async fn list_accounts(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
) -> AppResult<Json<AccountList>> {
    let accounts = ledger::list_accounts(&store, context.tenant_id).await?;
    Ok(Json(accounts))
}

/// POST /accounts
async fn create_account(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Json(request): Json<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<AccountCreated>)> {
    let result = ledger::create_account(&store, context.tenant_id, &request.name).await?;

    tracing::info!(
        tenant_id = %context.tenant_id,
        account_id = result.account_id,
        correlation_id = ?context.correlation_id,
        "Account created"
    );

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /accounts/:account/balance
async fn get_balance(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Path(account): Path<String>,
) -> AppResult<Json<BalanceReport>> {
    let account = AccountRef::parse(&account);
    let report = ledger::get_balance(&store, context.tenant_id, &account).await?;
    Ok(Json(report))
}

/// GET /accounts/:account/transactions
async fn get_transactions(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Path(account): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<TransactionHistory>> {
    let account = AccountRef::parse(&account);
    let history =
        ledger::get_transactions(&store, context.tenant_id, &account, query.limit).await?;
    Ok(Json(history))
}

/// DELETE /accounts/:account
async fn remove_account(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Path(account): Path<String>,
) -> AppResult<Json<AccountRemoved>> {
    let account = AccountRef::parse(&account);
    let result = ledger::remove_account(&store, context.tenant_id, &account).await?;

    tracing::info!(
        tenant_id = %context.tenant_id,
        account_id = result.account_id,
        transactions_removed = result.transactions_removed,
        correlation_id = ?context.correlation_id,
        "Account removed"
    );

    Ok(Json(result))
}

// =========================================================================
// Movements
// =========================================================================

/// POST /accounts/:account/deposits
async fn add_money(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Path(account): Path<String>,
    Json(request): Json<MovementRequest>,
) -> AppResult<Json<BalanceReport>> {
    let amount = parse_amount(&request.amount)?;
    let account = AccountRef::parse(&account);
    let report =
        ledger::add_money(&store, context.tenant_id, &account, amount, &request.reason).await?;

    tracing::info!(
        tenant_id = %context.tenant_id,
        account_id = report.account_id,
        amount = %amount,
        correlation_id = ?context.correlation_id,
        "Money added"
    );

    Ok(Json(report))
}

/// POST /accounts/:account/withdrawals
async fn withdraw_money(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Path(account): Path<String>,
    Json(request): Json<MovementRequest>,
) -> AppResult<Json<BalanceReport>> {
    let amount = parse_amount(&request.amount)?;
    let account = AccountRef::parse(&account);
    let report =
        ledger::withdraw_money(&store, context.tenant_id, &account, amount, &request.reason)
            .await?;

    tracing::info!(
        tenant_id = %context.tenant_id,
        account_id = report.account_id,
        amount = %amount,
        correlation_id = ?context.correlation_id,
        "Money withdrawn"
    );

    Ok(Json(report))
}

/// POST /transfers
async fn transfer_money(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Json(request): Json<TransferRequest>,
) -> AppResult<Json<TransferReceipt>> {
    let amount = parse_amount(&request.amount)?;
    let receipt = ledger::transfer_money(
        &store,
        context.tenant_id,
        &request.from,
        &request.to,
        amount,
        &request.reason,
    )
    .await?;

    tracing::info!(
        tenant_id = %context.tenant_id,
        from = %receipt.from,
        to = %receipt.to,
        amount = %amount,
        correlation_id = ?context.correlation_id,
        "Transfer completed"
    );

    Ok(Json(receipt))
}

// =========================================================================
// Agent tools
// =========================================================================

/// GET /tools
async fn list_tools() -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: tools::tool_definitions(),
    })
}

/// POST /tools/:operation
async fn invoke_tool(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Path(operation): Path<String>,
    body: Bytes,
) -> AppResult<Json<ToolResult>> {
    let args = tool_arguments_body(&body)?;
    let result = tools::dispatch(&store, context.tenant_id, &operation, args).await?;
    Ok(Json(result))
}

/// POST /tool-calls
async fn run_tool_calls(
    State(store): State<Store>,
    Extension(context): Extension<RequestContext>,
    Json(request): Json<ToolCallsRequest>,
) -> AppResult<Json<ToolCallsResponse>> {
    let tool_outputs =
        tools::run_tool_calls(&store, context.tenant_id, &request.tool_calls).await?;
    Ok(Json(ToolCallsResponse { tool_outputs }))
}
