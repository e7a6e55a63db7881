//! # Interpreter
//!
//! Turns input lines into command runs.
//!
//! The interpreter owns the [`Session`] and lends it to each handler
//! together with the output sink, the disassembler and the host facts. It
//! never reads input itself; the caller feeds it lines from a prompt, a
//! script or a test.

use std::io::{self, Write};

use tracing::trace;

use crate::backend::Driver;
use crate::command::Command;
use crate::commands::{dispatch, Context, Flow};
use crate::disasm::Disassembler;
use crate::host::HostInfo;
use crate::session::Session;

/// Line interpreter for one debugging session
pub struct Interpreter
{
    session: Session,
    disassembler: Box<dyn Disassembler>,
    host: HostInfo,
}

impl Interpreter
{
    /// Create an interpreter for the running host
    pub fn new(driver: Box<dyn Driver>, disassembler: Box<dyn Disassembler>) -> Self
    {
        Self::with_host(driver, disassembler, HostInfo::detect())
    }

    /// Create an interpreter with explicit host facts
    pub fn with_host(driver: Box<dyn Driver>, disassembler: Box<dyn Disassembler>, host: HostInfo) -> Self
    {
        Self {
            session: Session::new(driver),
            disassembler,
            host,
        }
    }

    /// Current session state
    pub fn session(&self) -> &Session
    {
        &self.session
    }

    /// Run one input line, writing everything it prints to `out`
    ///
    /// A line without tokens prints an empty line. Command failures are
    /// printed, not returned.
    ///
    /// ## Errors
    ///
    /// Only failures to write to `out`.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> io::Result<Flow>
    {
        trace!(line, "input");
        let Some(command) = Command::parse(line) else {
            writeln!(out)?;
            return Ok(Flow::Continue);
        };

        let mut ctx = Context {
            session: &mut self.session,
            out,
            disassembler: self.disassembler.as_ref(),
            host: &self.host,
        };
        dispatch(&command, &mut ctx)
    }
}
