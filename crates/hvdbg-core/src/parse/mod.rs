//! # Argument Parsers
//!
//! One parser per command family. Each walks the tokens after the command
//! name exactly once, left to right, carrying a small enumerated state that
//! says what the next token must be. Keywords (`l`, `pid`, `core`) move the
//! parser into an `Expecting*` state; the following token is consumed as
//! that role's value and the parser falls back to expecting a positional
//! value.
//!
//! Every role can be filled at most once. A parser returns a fully
//! validated request or an error; it never touches the transport.

pub mod connect;
pub mod memory;
pub mod msr;

pub use connect::parse_connect;
pub use memory::{parse_memory, DisplayStyle, MemoryCommand};
pub use msr::{parse_rdmsr, parse_wrmsr};

use crate::error::CommandError;

/// A keyword or positional role that appeared twice
fn repeated(role: &str, command: &str) -> CommandError
{
    CommandError::Syntax(format!("Err, {role} specified more than once in '{command}' command"))
}

/// A keyword that was not followed by its value
fn dangling(command: &str) -> CommandError
{
    CommandError::Syntax(format!("incorrect use of '{command}' command"))
}
