use crate::commands::{CmdCtx, CommandOutput};

pub fn uptime(ctx: &CmdCtx) -> CommandOutput {
    CommandOutput::reply(format!("Server uptime: {}", ctx.registry.uptime.format()))
}
