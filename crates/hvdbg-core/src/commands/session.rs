//! Connection and driver lifecycle commands.


use tracing::info;

use super::{no_args, Context, Flow};
use crate::command::Command;
use crate::error::HvdbgResult;
use crate::parse::parse_connect;
use crate::session::{Endpoint, Teardown};

pub(super) fn connect(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    let endpoint = parse_connect(command)?;
    ctx.session.connect(endpoint);
    match endpoint {
        Endpoint::Local => writeln!(ctx.out, "local debug current system")?,
        Endpoint::Remote { .. } => writeln!(ctx.out, "remote debug {endpoint}")?,
    }
    Ok(Flow::Continue)
}

pub(super) fn disconnect(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    no_args(command)?;
    ctx.session.disconnect()?;
    writeln!(ctx.out, "successfully disconnected")?;
    Ok(Flow::Continue)
}

pub(super) fn load(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    no_args(command)?;
    ctx.session.require_connected()?;

    if ctx.session.is_loaded() {
        writeln!(ctx.out, "driver is already loaded")?;
        return Ok(Flow::Continue);
    }

    writeln!(ctx.out, "try to install driver...")?;
    ctx.session.load()?;
    writeln!(ctx.out, "driver loaded")?;
    Ok(Flow::Continue)
}

pub(super) fn unload(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    no_args(command)?;
    ctx.session.require_connected()?;

    match ctx.session.unload()? {
        Teardown::NothingLoaded => writeln!(ctx.out, "there is nothing to unload")?,
        Teardown::Unloaded => writeln!(ctx.out, "driver unloaded")?,
    }
    Ok(Flow::Continue)
}

pub(super) fn exit(command: &Command, ctx: &mut Context<'_>) -> HvdbgResult<Flow>
{
    no_args(command)?;

    // exit never fails; a teardown error is reported and ignored
    if let Err(e) = ctx.session.unload() {
        writeln!(ctx.out, "{e}")?;
    }
    info!("exiting");
    Ok(Flow::Exit(0))
}
