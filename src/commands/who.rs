use crate::commands::{CmdCtx, CommandOutput};

pub fn who(ctx: &CmdCtx) -> CommandOutput {
    let mut message = String::from("Currently logged in users:\n");
    for username in ctx.registry.who() {
        message.push_str(&username);
        message.push('\n');
    }
    CommandOutput::reply(message)
}
