//! Parser for `.connect`.

use crate::command::Command;
use crate::error::{CommandError, HvdbgResult};
use crate::numeric::{parse_ip, parse_port};
use crate::session::Endpoint;

/// Parse `.connect local` or `.connect <ip> <port>`
///
/// Only the syntax of a remote endpoint is checked here; nothing is dialled.
///
/// ## Errors
///
/// `Syntax` for the wrong number of arguments, `Validation` for a bad
/// address or port.
pub fn parse_connect(command: &Command) -> HvdbgResult<Endpoint>
{
    match command.args() {
        [target] if target == "local" => Ok(Endpoint::Local),
        [ip, port] => {
            let ip = parse_ip(ip).ok_or_else(|| CommandError::Validation("incorrect ip address".to_string()))?;
            let port = parse_port(port).ok_or_else(|| CommandError::Validation("incorrect port".to_string()))?;
            Ok(Endpoint::Remote { ip, port })
        }
        _ => Err(CommandError::Syntax("incorrect use of '.connect'".to_string())),
    }
}
