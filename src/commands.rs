use crate::Registry;
use crate::input::parser::{Verb, parse_command};
use crate::net::output::OutputHandle;
use crate::state::registry::SessionHandle;
use crate::state::session::SessionId;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

mod exit;
mod login;
mod stats;
mod uptime;
mod who;

pub const UNKNOWN_COMMAND: &str = "Unknown command.";

pub type CommandResult<T> = Result<T, CommandError>;

/// Infrastructure faults only. Anything a client did wrong is answered with response text.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("session output is closed")]
    OutputClosed,
}

/// Command context passed to command handlers
pub struct CmdCtx {
    /// Output for this session
    pub output: OutputHandle,
    /// Shared server state
    pub registry: Arc<Registry>,
    /// The session the line came from
    pub sess: SessionHandle,
}

impl CmdCtx {
    pub fn session_id(&self) -> SessionId {
        self.sess.read().id
    }

    pub fn peer(&self) -> SocketAddr {
        self.sess.read().peer()
    }

    pub fn username(&self) -> Option<String> {
        self.sess.read().username().map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub message: String,
    /// Tear the session down once the message is sent
    pub close: bool,
}

impl CommandOutput {
    pub fn reply(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            close: false,
        }
    }

    pub fn close(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            close: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Maps one line to its response. No command requires a prior login.
pub async fn process_command(raw: &str, ctx: Arc<CmdCtx>) -> CommandOutput {
    let intent = parse_command(raw);
    // arguments may hold a password, only the verb is logged
    let verb = match &intent.verb {
        Verb::Unknown(_) => "<unknown>",
        known => known.as_str(),
    };
    tracing::debug!(session = %ctx.session_id(), verb, args = intent.args.len() - 1, "received command");

    match intent.verb {
        Verb::Login => login::login(ctx.clone(), intent).await,
        Verb::Who => who::who(&ctx),
        Verb::Uptime => uptime::uptime(&ctx),
        Verb::Stats => stats::stats(&ctx),
        Verb::Exit => exit::exit(&ctx),
        Verb::Unknown(_) => CommandOutput::reply(UNKNOWN_COMMAND),
    }
}

/// Handles one received line end to end: dispatch, send the response, then count it.
///
/// The count goes up exactly once per line, after the response is queued, and also
/// when the session is on its way out.
pub async fn dispatch_line(raw: &str, ctx: Arc<CmdCtx>) -> CommandResult<Flow> {
    let out = process_command(raw, ctx.clone()).await;

    let sent = ctx.output.line(out.message).await;
    ctx.registry.bump_processed();
    sent?;

    Ok(if out.close { Flow::Close } else { Flow::Continue })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::net::output::OutFrame;
    use crate::services::{BlockHook, CredentialStore, LockoutTracker, MemoryLoginLog, UptimeClock};
    use parking_lot::Mutex;
    use std::net::IpAddr;
    use tokio::sync::mpsc;

    #[derive(Default)]
    pub struct RecordingBlockHook {
        pub blocked: Mutex<Vec<IpAddr>>,
    }

    impl BlockHook for RecordingBlockHook {
        fn block(&self, addr: IpAddr) {
            self.blocked.lock().push(addr);
        }
    }

    pub struct Harness {
        pub registry: Arc<Registry>,
        pub login_log: Arc<MemoryLoginLog>,
        pub block_hook: Arc<RecordingBlockHook>,
    }

    impl Harness {
        pub fn new(credentials: &str) -> Self {
            let login_log = Arc::new(MemoryLoginLog::new());
            let block_hook = Arc::new(RecordingBlockHook::default());
            let registry = Arc::new(Registry::new(
                CredentialStore::parse(credentials),
                LockoutTracker::default(),
                UptimeClock::start(),
                login_log.clone(),
                block_hook.clone(),
            ));
            Self {
                registry,
                login_log,
                block_hook,
            }
        }

        /// Registers a session for `peer` and returns its context plus the output queue.
        pub fn connect(&self, peer: &str) -> (Arc<CmdCtx>, mpsc::Receiver<OutFrame>) {
            let (tx, rx) = mpsc::channel(64);
            let sess = self.registry.sessions.register(peer.parse().unwrap());
            let ctx = Arc::new(CmdCtx {
                output: OutputHandle::new(tx),
                registry: self.registry.clone(),
                sess,
            });
            (ctx, rx)
        }
    }

    pub async fn run(ctx: &Arc<CmdCtx>, raw: &str) -> String {
        process_command(raw, ctx.clone()).await.message
    }
}
