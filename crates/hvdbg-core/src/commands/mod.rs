//! # Commands
//!
//! The dispatch table and every command handler.
//!
//! Each entry of [`COMMANDS`] lists the names that select it, a one-line
//! summary, the usage text, and a [`Handler`]. Aliases are extra names on the
//! same entry, so `cls` and `.cls` share `clear`'s handler and the ten memory
//! commands share one parser.
//!
//! Lookup is an exact match on the first token. `connect` and `disconnect`
//! are not commands, but get a hint pointing at their dotted forms.

mod backend;
mod misc;
mod session;
pub mod usage;

use std::collections::HashMap;
use std::io::{self, Write};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

pub use backend::BackendOp;

use crate::command::Command;
use crate::disasm::Disassembler;
use crate::error::{CommandError, HvdbgResult};
use crate::host::HostInfo;
use crate::session::Session;

/// What the interpreter does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow
{
    /// Read the next line
    Continue,
    /// Terminate the process with this exit code
    Exit(i32),
}

/// Everything a handler may touch while it runs
pub struct Context<'a>
{
    /// Connection and driver state
    pub session: &'a mut Session,
    /// Where command output goes
    pub out: &'a mut dyn Write,
    /// Decoder for `u` / `!u`
    pub disassembler: &'a dyn Disassembler,
    /// Own pid and processor count
    pub host: &'a HostInfo,
}

/// How a command runs
#[derive(Clone, Copy)]
pub enum Handler
{
    /// Runs without the backend transport
    Local(fn(&Command, &mut Context<'_>) -> HvdbgResult<Flow>),
    /// Parses into a request, then runs against the loaded transport
    ///
    /// Parsing happens first, so syntax errors are reported even when no
    /// driver is loaded, and nothing is sent for a malformed command.
    Backend(fn(&Command, &HostInfo) -> HvdbgResult<BackendOp>),
}

/// One entry of the dispatch table
#[derive(Clone, Copy)]
pub struct CommandSpec
{
    /// Names that select this command; the first is canonical
    pub names: &'static [&'static str],
    /// One-line description for `help`
    pub summary: &'static str,
    /// Full usage text
    pub usage: &'static str,
    /// What runs
    pub handler: Handler,
}

/// Every command the interpreter understands
pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        names: &["clear", "cls", ".cls"],
        summary: "clears the screen",
        usage: usage::CLEAR,
        handler: Handler::Local(misc::clear),
    },
    CommandSpec {
        names: &[".connect"],
        summary: "connects to a remote or local machine",
        usage: usage::CONNECT,
        handler: Handler::Local(session::connect),
    },
    CommandSpec {
        names: &[".disconnect"],
        summary: "disconnects from the debugging session",
        usage: usage::DISCONNECT,
        handler: Handler::Local(session::disconnect),
    },
    CommandSpec {
        names: &["load"],
        summary: "installs the driver and loads the kernel modules",
        usage: usage::LOAD,
        handler: Handler::Local(session::load),
    },
    CommandSpec {
        names: &["unload"],
        summary: "unloads the kernel modules and uninstalls the driver",
        usage: usage::UNLOAD,
        handler: Handler::Local(session::unload),
    },
    CommandSpec {
        names: &["exit", ".exit"],
        summary: "unloads the driver if needed and closes the debugger",
        usage: usage::EXIT,
        handler: Handler::Local(session::exit),
    },
    CommandSpec {
        names: &["cpu"],
        summary: "reports cpu features",
        usage: usage::CPU,
        handler: Handler::Local(misc::cpu),
    },
    CommandSpec {
        names: &["rdmsr"],
        summary: "reads a model-specific register",
        usage: usage::RDMSR,
        handler: Handler::Backend(backend::rdmsr),
    },
    CommandSpec {
        names: &["wrmsr"],
        summary: "writes a model-specific register",
        usage: usage::WRMSR,
        handler: Handler::Backend(backend::wrmsr),
    },
    CommandSpec {
        names: &[".formats"],
        summary: "shows a value in different formats",
        usage: usage::FORMATS,
        handler: Handler::Local(misc::formats),
    },
    CommandSpec {
        names: &["db", "dc", "dd", "dq", "!db", "!dc", "!dd", "!dq", "u", "!u"],
        summary: "reads memory as bytes, dwords or qwords, or disassembles it",
        usage: usage::READ_MEMORY,
        handler: Handler::Backend(backend::read_memory),
    },
    CommandSpec {
        names: &["!hiddenhook", "bh"],
        summary: "hidden hook (arguments are echoed)",
        usage: usage::HIDDEN_HOOK,
        handler: Handler::Local(misc::hidden_hook),
    },
    CommandSpec {
        names: &["help", ".help"],
        summary: "lists commands or shows one command's syntax",
        usage: usage::HELP,
        handler: Handler::Local(misc::help),
    },
];

/// Near misses that get a hint instead of the plain diagnostic
const SUGGESTIONS: &[(&str, &str)] = &[("connect", ".connect"), ("disconnect", ".disconnect")];

static LOOKUP: Lazy<HashMap<&'static str, &'static CommandSpec>> = Lazy::new(|| {
    COMMANDS
        .iter()
        .flat_map(|spec| spec.names.iter().map(move |&name| (name, spec)))
        .collect()
});

/// Find the table entry selected by `name`
pub fn lookup(name: &str) -> Option<&'static CommandSpec>
{
    LOOKUP.get(name).copied()
}

/// Run `command` and report any failure on `ctx.out`
///
/// Only output errors escape; every command failure is printed and turned
/// into [`Flow::Continue`].
///
/// ## Errors
///
/// Propagates write failures.
pub fn dispatch(command: &Command, ctx: &mut Context<'_>) -> io::Result<Flow>
{
    let name = command.name();
    let Some(spec) = lookup(name) else {
        warn!(command = name, "unrecognized command");
        match SUGGESTIONS.iter().find(|(typo, _)| *typo == name) {
            Some((_, hint)) => writeln!(ctx.out, "Couldn't resolve error at '{name}', did you mean '{hint}'?")?,
            None => writeln!(ctx.out, "Couldn't resolve error at '{name}'")?,
        }
        return Ok(Flow::Continue);
    };

    debug!(command = name, args = command.args().len(), "dispatching");
    match run(spec, command, ctx) {
        Ok(flow) => Ok(flow),
        Err(CommandError::Io(e)) => Err(e),
        Err(e) => {
            warn!(command = name, error = %e, "command failed");
            if e.shows_usage() {
                write!(ctx.out, "{e}\n\n{}", spec.usage)?;
            } else {
                writeln!(ctx.out, "{e}")?;
            }
            Ok(Flow::Continue)
        }
    }
}

fn run(spec: &CommandSpec, command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    match spec.handler {
        Handler::Local(handler) => handler(command, ctx),
        Handler::Backend(parse) => {
            let op = parse(command, ctx.host)?;
            let transport = ctx.session.transport()?;
            op.execute(transport, ctx.out, ctx.disassembler, ctx.host)?;
            Ok(Flow::Continue)
        }
    }
}

/// Fail with a syntax error unless `command` has no arguments
fn no_args(command: &Command) -> HvdbgResult<()>
{
    if command.args().is_empty() {
        Ok(())
    } else {
        Err(CommandError::Syntax(format!("incorrect use of '{}'", command.name())))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_every_name_is_unique()
    {
        let total: usize = COMMANDS.iter().map(|spec| spec.names.len()).sum();
        assert_eq!(LOOKUP.len(), total);
    }

    #[test]
    fn test_aliases_share_an_entry()
    {
        let clear = lookup("clear").unwrap();
        assert!(std::ptr::eq(clear, lookup(".cls").unwrap()));
        assert!(std::ptr::eq(lookup("db").unwrap(), lookup("!u").unwrap()));
        assert!(std::ptr::eq(lookup("bh").unwrap(), lookup("!hiddenhook").unwrap()));
    }

    #[test]
    fn test_lookup_is_exact()
    {
        assert!(lookup("connect").is_none());
        assert!(lookup("rdms").is_none());
        assert!(lookup("RDMSR").is_none());
    }
}
