//! Typed ledger commands
//!
//! One variant per [`Operation`], carrying the coerced arguments. Parsing
//! and execution are both exhaustive matches, so adding an operation fails
//! to compile until it is wired through.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{AccountRef, Amount, LedgerError, TenantId};
use crate::ledger;
use crate::store::Store;

use super::args::{ArgumentError, ToolArguments};
use super::operation::Operation;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateAccount {
        name: String,
    },
    ListAccounts,
    GetBalance {
        account: AccountRef,
    },
    GetTransactions {
        account: AccountRef,
        limit: Option<u32>,
    },
    AddMoney {
        account: AccountRef,
        amount: Amount,
        reason: String,
    },
    WithdrawMoney {
        account: AccountRef,
        amount: Amount,
        reason: String,
    },
    TransferMoney {
        from: AccountRef,
        to: AccountRef,
        amount: Amount,
        reason: String,
    },
    RemoveAccount {
        account: AccountRef,
    },
}

/// Failure while executing a command
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Command {
    /// Coerce an argument bag into the command for `operation`.
    ///
    /// `subscription_id` is never read: the tenant comes from the caller.
    pub fn parse(operation: Operation, args: &ToolArguments) -> Result<Self, ArgumentError> {
        let command = match operation {
            Operation::CreateAccount => Command::CreateAccount {
                name: args.require_string("name")?,
            },
            Operation::ListAccounts => Command::ListAccounts,
            Operation::GetBalance => Command::GetBalance {
                account: args.account_ref("account_id", "name")?,
            },
            Operation::GetTransactions => Command::GetTransactions {
                account: args.account_ref("account_id", "name")?,
                limit: match args.limit("limit")? {
                    Some(limit) => Some(limit),
                    None => args.limit("last_n")?,
                },
            },
            Operation::AddMoney => Command::AddMoney {
                account: args.account_ref("account_id", "name")?,
                amount: args.amount("amount")?,
                reason: args.require_string("reason")?,
            },
            Operation::WithdrawMoney => Command::WithdrawMoney {
                account: args.account_ref("account_id", "name")?,
                amount: args.amount("amount")?,
                reason: args.require_string("reason")?,
            },
            Operation::TransferMoney => Command::TransferMoney {
                from: args.account_ref("from_account_id", "from_name")?,
                to: args.account_ref("to_account_id", "to_name")?,
                amount: args.amount("amount")?,
                reason: args.require_string("reason")?,
            },
            Operation::RemoveAccount => Command::RemoveAccount {
                account: args.account_ref("account_id", "name")?,
            },
        };
        Ok(command)
    }

    pub fn operation(&self) -> Operation {
        match self {
            Command::CreateAccount { .. } => Operation::CreateAccount,
            Command::ListAccounts => Operation::ListAccounts,
            Command::GetBalance { .. } => Operation::GetBalance,
            Command::GetTransactions { .. } => Operation::GetTransactions,
            Command::AddMoney { .. } => Operation::AddMoney,
            Command::WithdrawMoney { .. } => Operation::WithdrawMoney,
            Command::TransferMoney { .. } => Operation::TransferMoney,
            Command::RemoveAccount { .. } => Operation::RemoveAccount,
        }
    }

    /// Run the command against the ledger and serialize its result
    pub async fn execute(&self, store: &Store, tenant: TenantId) -> Result<Value, CommandError> {
        match self {
            Command::CreateAccount { name } => {
                to_value(ledger::create_account(store, tenant, name).await?)
            }
            Command::ListAccounts => to_value(ledger::list_accounts(store, tenant).await?),
            Command::GetBalance { account } => {
                to_value(ledger::get_balance(store, tenant, account).await?)
            }
            Command::GetTransactions { account, limit } => {
                to_value(ledger::get_transactions(store, tenant, account, *limit).await?)
            }
            Command::AddMoney {
                account,
                amount,
                reason,
            } => to_value(ledger::add_money(store, tenant, account, *amount, reason).await?),
            Command::WithdrawMoney {
                account,
                amount,
                reason,
            } => to_value(ledger::withdraw_money(store, tenant, account, *amount, reason).await?),
            Command::TransferMoney {
                from,
                to,
                amount,
                reason,
            } => to_value(ledger::transfer_money(store, tenant, from, to, *amount, reason).await?),
            Command::RemoveAccount { account } => {
                to_value(ledger::remove_account(store, tenant, account).await?)
            }
        }
    }
}

fn to_value<T: Serialize>(result: T) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn parse(operation: Operation, value: Value) -> Result<Command, ArgumentError> {
        Command::parse(operation, &ToolArguments::from_value(value).unwrap())
    }

    #[test]
    fn test_parse_create_account() {
        let cmd = parse(Operation::CreateAccount, json!({"name": "Bob", "subscription_id": 9}));
        assert_eq!(
            cmd.unwrap(),
            Command::CreateAccount {
                name: "Bob".to_string()
            }
        );
    }

    #[test]
    fn test_parse_list_accounts_ignores_arguments() {
        let cmd = parse(Operation::ListAccounts, json!({"subscription_id": "2"})).unwrap();
        assert_eq!(cmd, Command::ListAccounts);
    }

    #[test]
    fn test_parse_add_money() {
        let cmd = parse(
            Operation::AddMoney,
            json!({"name": "bob", "amount": "50", "reason": "deposit"}),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::AddMoney {
                account: AccountRef::name("bob"),
                amount: Amount::new(dec!(50)).unwrap(),
                reason: "deposit".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_transfer_by_mixed_refs() {
        let cmd = parse(
            Operation::TransferMoney,
            json!({"from_account_id": 1, "to_name": "eve", "amount": 30, "reason": "gift"}),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::TransferMoney {
                from: AccountRef::Id(1),
                to: AccountRef::name("eve"),
                amount: Amount::new(dec!(30)).unwrap(),
                reason: "gift".to_string(),
            }
        );
        assert_eq!(cmd.operation(), Operation::TransferMoney);
    }

    #[test]
    fn test_parse_transactions_limit_aliases() {
        let cmd = parse(Operation::GetTransactions, json!({"name": "bob", "last_n": 3})).unwrap();
        assert_eq!(
            cmd,
            Command::GetTransactions {
                account: AccountRef::name("bob"),
                limit: Some(3),
            }
        );
    }

    #[test]
    fn test_parse_missing_arguments() {
        assert_eq!(
            parse(Operation::WithdrawMoney, json!({"name": "bob", "amount": 5})),
            Err(ArgumentError::Missing("reason"))
        );
        assert!(matches!(
            parse(Operation::GetBalance, json!({})),
            Err(ArgumentError::MissingAccount { .. })
        ));
    }
}
