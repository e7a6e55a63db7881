use std::io::{self, Write};
use std::process;

use clap::Parser;
use hvdbg_core::{create_driver, Flow, HostInfo, Interpreter};
use hvdbg_utils::{
    info, init_logging, init_logging_for_repl, init_logging_with_level, warn, LogFormat, LogLevel, LoggingGuard,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

mod disasm;

use disasm::IcedDisassembler;

const PROMPT: &str = "hvdbg> ";

/// Interactive command console for a hypervisor-assisted kernel debugger.
#[derive(Parser, Debug)]
#[command(name = "hvdbg")]
#[command(version)]
#[command(about = "Interactive command console for a hypervisor-assisted kernel debugger", long_about = None)]
struct Cli
{
    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Log to stderr instead of the dated file under ~/.hvdbg
    #[arg(long, default_value_t = false)]
    log_stderr: bool,

    /// Run a command and exit; may be given several times
    #[arg(short = 'x', long = "execute", value_name = "COMMAND")]
    execute: Vec<String>,

    /// Do not record input lines in the prompt history
    #[arg(long, default_value_t = false)]
    no_history: bool,
}

fn main()
{
    let cli = Cli::parse();

    let guard = match start_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    let host = HostInfo::detect();
    info!(pid = host.pid, cores = host.logical_cores, "starting hvdbg");
    let mut interpreter = Interpreter::with_host(create_driver(host.logical_cores), Box::new(IcedDisassembler), host);

    let result = if cli.execute.is_empty() {
        run_prompt(&mut interpreter, !cli.no_history)
    } else {
        run_script(&mut interpreter, &cli.execute)
    };

    let code = result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        1
    });
    // flush the log file before exiting
    drop(guard);
    process::exit(code);
}

fn start_logging(cli: &Cli) -> Result<LoggingGuard, Box<dyn std::error::Error>>
{
    if cli.log_stderr {
        let guard = match cli.log_level {
            Some(level) => init_logging_with_level(level, LogFormat::Pretty)?,
            None => init_logging()?,
        };
        return Ok(guard);
    }

    let (path, guard) = init_logging_for_repl(cli.log_level)?;
    info!(path = %path.display(), "logging to file");
    Ok(guard)
}

/// Run `-x` commands in order, stopping early on `exit`
fn run_script(interpreter: &mut Interpreter, commands: &[String]) -> Result<i32, Box<dyn std::error::Error>>
{
    let mut stdout = io::stdout().lock();
    for line in commands {
        if let Flow::Exit(code) = interpreter.execute(line, &mut stdout)? {
            return Ok(code);
        }
    }
    stdout.flush()?;
    Ok(0)
}

/// Read lines from the prompt until `exit`, Ctrl-C or Ctrl-D
fn run_prompt(interpreter: &mut Interpreter, history: bool) -> Result<i32, Box<dyn std::error::Error>>
{
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if history && !line.trim().is_empty() {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        warn!(error = %e, "failed to record history entry");
                    }
                }

                let mut stdout = io::stdout().lock();
                let flow = interpreter.execute(&line, &mut stdout)?;
                stdout.flush()?;
                if let Flow::Exit(code) = flow {
                    return Ok(code);
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                // same teardown as typing `exit`
                let mut stdout = io::stdout().lock();
                let flow = interpreter.execute("exit", &mut stdout)?;
                stdout.flush()?;
                return Ok(match flow {
                    Flow::Exit(code) => code,
                    Flow::Continue => 0,
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
}
