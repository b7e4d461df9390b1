//! Tool-dispatch adapter
//!
//! Typed boundary between untyped agent tool calls and the ledger engine.
//! Holds no business rules of its own.

mod args;
mod catalog;
mod command;
mod dispatch;
mod operation;

pub use args::{ArgumentError, ToolArguments};
pub use catalog::tool_definitions;
pub use command::{Command, CommandError};
pub use dispatch::{
    dispatch, dispatch_operation, run_tool_calls, DispatchError, FunctionCall, ToolCall,
    ToolOutput, ToolResult,
};
pub use operation::{Operation, UnknownOperation};
