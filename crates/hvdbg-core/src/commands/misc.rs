//! Commands that need neither a connection nor the driver.


use chrono::Local;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use super::{lookup, no_args, Context, Flow, COMMANDS};
use crate::command::Command;
use crate::cpu::CpuReport;
use crate::error::{CommandError, HvdbgResult};
use crate::numeric::parse_address;
use crate::render::formats::render_formats;

pub(super) fn clear(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    no_args(command)?;
    ctx.out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    ctx.out.flush()?;
    Ok(Flow::Continue)
}

pub(super) fn cpu(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    no_args(command)?;
    CpuReport::detect(ctx.host.logical_cores).render(ctx.out)?;
    Ok(Flow::Continue)
}

pub(super) fn formats(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    let [token] = command.args() else {
        return Err(CommandError::Validation("incorrect use of '.formats'".to_string()));
    };
    let value =
        parse_address(token).ok_or_else(|| CommandError::Validation("incorrect use of '.formats'".to_string()))?;

    render_formats(ctx.out, value, &Local::now().naive_local())?;
    Ok(Flow::Continue)
}

pub(super) fn hidden_hook(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    for token in command.tokens() {
        writeln!(ctx.out, "{token}")?;
    }
    Ok(Flow::Continue)
}

pub(super) fn help(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    match command.args() {
        [] => {
            for spec in COMMANDS {
                writeln!(ctx.out, "{:<36}{}", spec.names.join(", "), spec.summary)?;
            }
            writeln!(ctx.out, "\nuse 'help <command>' for its syntax")?;
        }
        [name] => {
            let spec = lookup(name).ok_or_else(|| CommandError::Validation(format!("unknown command '{name}'")))?;
            write!(ctx.out, "{}", spec.usage)?;
        }
        _ => return Err(CommandError::Syntax("incorrect use of 'help'".to_string())),
    }
    Ok(Flow::Continue)
}
