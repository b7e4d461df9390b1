//! Operation names
//!
//! Closed set of ledger operations an agent may invoke.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[serde(alias = "add_account")]
    CreateAccount,
    ListAccounts,
    GetBalance,
    GetTransactions,
    AddMoney,
    WithdrawMoney,
    TransferMoney,
    RemoveAccount,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::CreateAccount,
        Operation::ListAccounts,
        Operation::GetBalance,
        Operation::GetTransactions,
        Operation::AddMoney,
        Operation::WithdrawMoney,
        Operation::TransferMoney,
        Operation::RemoveAccount,
    ];

    /// Wire name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateAccount => "create_account",
            Operation::ListAccounts => "list_accounts",
            Operation::GetBalance => "get_balance",
            Operation::GetTransactions => "get_transactions",
            Operation::AddMoney => "add_money",
            Operation::WithdrawMoney => "withdraw_money",
            Operation::TransferMoney => "transfer_money",
            Operation::RemoveAccount => "remove_account",
        }
    }

    /// Whether the operation appends to or deletes from the ledger
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Operation::ListAccounts | Operation::GetBalance | Operation::GetTransactions
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name that matches no operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "add_account" {
            return Ok(Operation::CreateAccount);
        }
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}
