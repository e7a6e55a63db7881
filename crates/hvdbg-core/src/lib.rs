//! # hvdbg Core
//!
//! The command interpreter of the hvdbg hypervisor debugger.
//!
//! A line typed at the prompt is normalized into a [`Command`], looked up in
//! the dispatch table, parsed into a typed request, sent to the backend
//! driver over a [`Transport`](hvdbg_protocol::Transport), and the response
//! is printed as a hex dump, disassembly or MSR table.
//!
//! ## Example
//!
//! ```rust
//! use std::io::Write;
//!
//! use hvdbg_core::{create_driver, Disassembler, Flow, Interpreter};
//!
//! struct NoDisassembly;
//!
//! impl Disassembler for NoDisassembly
//! {
//!     fn disassemble(&self, _code: &[u8], _base: u64, _out: &mut dyn Write) -> std::io::Result<()>
//!     {
//!         Ok(())
//!     }
//! }
//!
//! let mut interpreter = Interpreter::new(create_driver(1), Box::new(NoDisassembly));
//! let mut out = Vec::new();
//! interpreter.execute(".connect local", &mut out).unwrap();
//! interpreter.execute("load", &mut out).unwrap();
//! interpreter.execute("rdmsr c0000080 core 0", &mut out).unwrap();
//! assert_eq!(interpreter.execute("exit", &mut out).unwrap(), Flow::Exit(0));
//! ```

pub mod backend;
pub mod command;
pub mod commands;
pub mod cpu;
pub mod disasm;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod numeric;
pub mod parse;
pub mod render;
pub mod session;

pub use backend::{create_driver, Driver, DriverError, LoopbackDriver};
pub use command::Command;
pub use commands::Flow;
pub use disasm::Disassembler;
pub use error::{CommandError, HvdbgResult};
pub use host::HostInfo;
pub use interpreter::Interpreter;
pub use session::{Endpoint, Session, Teardown};
