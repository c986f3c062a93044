mod block;
mod credentials;
mod lockout;
mod login_log;
mod uptime;

pub use block::{BlockHook, CommandBlockHook, LogBlockHook};
pub use credentials::CredentialStore;
pub use lockout::LockoutTracker;
pub use login_log::{FileLoginLog, LoginLog, MemoryLoginLog, format_entry};
pub use uptime::{UptimeClock, format_uptime};
