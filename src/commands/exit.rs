use crate::commands::{CmdCtx, CommandOutput};

pub const GOODBYE: &str = "Goodbye!";

/// The connection layer tears the session down after the farewell is queued.
pub fn exit(ctx: &CmdCtx) -> CommandOutput {
    tracing::debug!(session = %ctx.session_id(), "exit requested");
    CommandOutput::close(GOODBYE)
}
