use crate::commands::{CmdCtx, CommandOutput};

/// "Failed login attempts" is the number of distinct addresses with a recorded
/// failure, not the total number of failures.
pub fn stats(ctx: &CmdCtx) -> CommandOutput {
    let registry = &ctx.registry;

    let logged_in = registry.sessions.logged_in_count();
    let failed_addresses = registry.lockout.blocked_address_count();
    let processed = registry.processed_commands();

    CommandOutput::reply(format!(
        "Statistics:\nLogged in users: {logged_in}\nFailed login attempts: {failed_addresses}\nProcessed commands: {processed}\n"
    ))
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::*;

    #[tokio::test]
    async fn fresh_server() {
        let h = Harness::new("alice:secretpw");
        let (ctx, _rx) = h.connect("127.0.0.1:7200");

        assert_eq!(
            run(&ctx, "stats").await,
            "Statistics:\nLogged in users: 0\nFailed login attempts: 0\nProcessed commands: 0\n"
        );
    }

    #[tokio::test]
    async fn failed_attempts_counts_addresses() {
        let h = Harness::new("alice:secretpw");
        let (a, _ra) = h.connect("10.0.0.1:1");
        let (b, _rb) = h.connect("10.0.0.2:1");

        for _ in 0..4 {
            run(&a, "login alice nope").await;
        }
        run(&b, "login alice nope").await;
        run(&b, "login alice secretpw").await;

        let out = run(&a, "stats").await;
        assert!(out.contains("Logged in users: 1\n"), "{out}");
        assert!(out.contains("Failed login attempts: 2\n"), "{out}");
    }
}
