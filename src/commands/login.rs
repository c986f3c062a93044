use crate::commands::{CmdCtx, CommandOutput};
use crate::input::parser::Intent;
use std::sync::Arc;

pub const LOGGED_IN: &str = "Logged in successfully.";
pub const INVALID_LOGIN_COMMAND: &str = "Invalid login command.";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
pub const BLOCKED_SUFFIX: &str = " Your IP address has been blocked.";

pub async fn login(ctx: Arc<CmdCtx>, intent: Intent) -> CommandOutput {
    // Step 1: Validate input
    let [_, username, password] = intent.args.as_slice() else {
        return CommandOutput::reply(INVALID_LOGIN_COMMAND);
    };

    let registry = &ctx.registry;
    let peer = ctx.peer();

    // Step 2: Check the credential table
    if registry.credentials.verify(username, password) {
        ctx.sess.write().login(username.as_str());
        tracing::info!(%peer, %username, "login succeeded");
        registry.login_log.record(username, peer).await;
        return CommandOutput::reply(LOGGED_IN);
    }

    // Step 3: Count the failure against the remote address. The count is never reset.
    let addr = peer.ip();
    let failures = registry.lockout.record_failure(addr);
    tracing::warn!(%peer, %username, failures, "login failed");

    if registry.lockout.should_block(failures) {
        registry.block_hook.block(addr);
        return CommandOutput::reply(format!("{INVALID_CREDENTIALS}{BLOCKED_SUFFIX}"));
    }

    CommandOutput::reply(INVALID_CREDENTIALS)
}
