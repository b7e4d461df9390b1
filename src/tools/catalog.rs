//! Tool catalog
//!
//! Function definitions advertised to the agent, in the OpenAI tools format.
//! The tenant is never a parameter; it comes from authentication.

use serde_json::{json, Map, Value};

use super::operation::Operation;

fn account_properties(id_field: &str, name_field: &str, role: &str) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert(
        id_field.to_string(),
        json!({"type": "integer", "description": format!("The id of the account{}. Takes precedence over the name.", role)}),
    );
    props.insert(
        name_field.to_string(),
        json!({"type": "string", "description": format!("The name of the account{}.", role)}),
    );
    props
}

fn money_properties(verb: &str) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert(
        "amount".to_string(),
        json!({"type": "number", "description": format!("The amount of money to {}. Must be positive, at most 2 decimals.", verb)}),
    );
    props.insert(
        "reason".to_string(),
        json!({"type": "string", "description": format!("The reason to {} the money.", verb)}),
    );
    props
}

fn parameters(properties: Map<String, Value>, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn describe(operation: Operation) -> (&'static str, Value) {
    match operation {
        Operation::CreateAccount => (
            "Adds a new account to the piggy bank with a balance of 0.",
            parameters(
                Map::from_iter([(
                    "name".to_string(),
                    json!({"type": "string", "description": "The name of the account to add."}),
                )]),
                &["name"],
            ),
        ),
        Operation::ListAccounts => (
            "Lists all accounts in the piggy bank with their balances.",
            parameters(Map::new(), &[]),
        ),
        Operation::GetBalance => (
            "Gets the balance of a specific account.",
            parameters(account_properties("account_id", "name", ""), &[]),
        ),
        Operation::GetTransactions => {
            let mut props = account_properties("account_id", "name", "");
            props.insert(
                "limit".to_string(),
                json!({"type": "integer", "description": "How many recent transactions to return (default 5, max 100)."}),
            );
            (
                "Gets the most recent transactions of a specific account, newest first.",
                parameters(props, &[]),
            )
        }
        Operation::AddMoney => {
            let mut props = account_properties("account_id", "name", "");
            props.extend(money_properties("add"));
            (
                "Adds money to a specific account.",
                parameters(props, &["amount", "reason"]),
            )
        }
        Operation::WithdrawMoney => {
            let mut props = account_properties("account_id", "name", "");
            props.extend(money_properties("withdraw"));
            (
                "Withdraws money from a specific account if the balance covers it.",
                parameters(props, &["amount", "reason"]),
            )
        }
        Operation::TransferMoney => {
            let mut props = account_properties("from_account_id", "from_name", " to transfer from");
            props.extend(account_properties("to_account_id", "to_name", " to transfer to"));
            props.extend(money_properties("transfer"));
            (
                "Transfers money from one account to another.",
                parameters(props, &["amount", "reason"]),
            )
        }
        Operation::RemoveAccount => (
            "Removes an account and its history. Only allowed when the balance is exactly 0.",
            parameters(account_properties("account_id", "name", " to remove"), &[]),
        ),
    }
}

/// Definitions of every operation
pub fn tool_definitions() -> Vec<Value> {
    Operation::ALL
        .into_iter()
        .map(|operation| {
            let (description, parameters) = describe(operation);
            json!({
                "type": "function",
                "function": {
                    "name": operation.as_str(),
                    "description": description,
                    "parameters": parameters,
                },
            })
        })
        .collect()
}
