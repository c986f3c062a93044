use std::net::IpAddr;
use tokio::process::Command;

/// Invoked once an address reaches the failed-login threshold, and again on every
/// later failure from it. Fire-and-forget: the caller never waits for, or sees, the outcome.
pub trait BlockHook: Send + Sync {
    fn block(&self, addr: IpAddr);
}

/// Only records the block in the server log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBlockHook;

impl BlockHook for LogBlockHook {
    fn block(&self, addr: IpAddr) {
        tracing::warn!("Blocked IP address: {addr}");
    }
}

/// Runs an operator-supplied shell command with `{ip}` replaced by the address,
/// e.g. `iptables -A INPUT -s {ip} -j DROP`.
#[derive(Debug, Clone)]
pub struct CommandBlockHook {
    template: String,
}

impl CommandBlockHook {
    pub const PLACEHOLDER: &'static str = "{ip}";

    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, addr: IpAddr) -> String {
        self.template.replace(Self::PLACEHOLDER, &addr.to_string())
    }
}

impl BlockHook for CommandBlockHook {
    fn block(&self, addr: IpAddr) {
        LogBlockHook.block(addr);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!(%addr, "no runtime available, block command skipped");
            return;
        };

        let command = self.render(addr);
        handle.spawn(async move {
            match Command::new("sh").arg("-c").arg(&command).status().await {
                Ok(status) if status.success() => {
                    tracing::info!(%addr, %command, "block command finished");
                }
                Ok(status) => {
                    tracing::warn!(%addr, %command, %status, "block command failed");
                }
                Err(e) => {
                    tracing::error!(%addr, %command, error = %e, "cannot run block command");
                }
            }
        });
    }
}
