use crate::services::{BlockHook, CredentialStore, LockoutTracker, LoginLog, UptimeClock};
use crate::state::session::{Session, SessionId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub type SessionHandle = Arc<RwLock<Session>>;

/// Live sessions in connection order.
///
/// Lock order: a session lock is never held while the registry lock is taken.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<BTreeMap<SessionId, SessionHandle>>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for a freshly accepted connection and adds it.
    pub fn register(&self, peer: SocketAddr) -> SessionHandle {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let sess = Arc::new(RwLock::new(Session::new(id, peer)));
        self.add(sess.clone());
        sess
    }

    pub fn add(&self, sess: SessionHandle) {
        let id = sess.read().id;
        self.sessions.write().insert(id, sess);
    }

    pub fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().remove(&id).is_some()
    }

    /// Handles of all live sessions in connection order. The registry lock is
    /// released before the caller touches any session.
    pub fn snapshot(&self) -> Vec<SessionHandle> {
        self.sessions.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Usernames of authenticated sessions, in connection order.
    pub fn logged_in_usernames(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .filter_map(|s| s.read().username().map(str::to_string))
            .collect()
    }

    pub fn logged_in_count(&self) -> usize {
        self.snapshot().iter().filter(|s| s.read().is_logged_in()).count()
    }
}

/// Shared state handed to every connection.
pub struct Registry {
    pub credentials: CredentialStore,
    pub lockout: LockoutTracker,
    pub sessions: SessionRegistry,
    pub uptime: UptimeClock,
    pub login_log: Arc<dyn LoginLog>,
    pub block_hook: Arc<dyn BlockHook>,
    processed_commands: AtomicU64,
}

impl Registry {
    pub fn new(
        credentials: CredentialStore,
        lockout: LockoutTracker,
        uptime: UptimeClock,
        login_log: Arc<dyn LoginLog>,
        block_hook: Arc<dyn BlockHook>,
    ) -> Self {
        Self {
            credentials,
            lockout,
            sessions: SessionRegistry::new(),
            uptime,
            login_log,
            block_hook,
            processed_commands: AtomicU64::new(0),
        }
    }

    pub fn processed_commands(&self) -> u64 {
        self.processed_commands.load(Ordering::SeqCst)
    }

    /// Counts one received line. Returns the new total.
    pub fn bump_processed(&self) -> u64 {
        self.processed_commands.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn who(&self) -> Vec<String> {
        self.sessions.logged_in_usernames()
    }
}
