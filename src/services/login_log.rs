use async_trait::async_trait;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Sink for successful logins. Recording never fails from the caller's point of view.
#[async_trait]
pub trait LoginLog: Send + Sync {
    async fn record(&self, username: &str, peer: SocketAddr);
}

pub fn format_entry(at: DateTime<Local>, username: &str, peer: SocketAddr) -> String {
    format!("{} - {username} logged in from {peer}\n", at.format("%Y-%m-%d %H:%M:%S"))
}

/// Appends one line per login to a file, creating it on first use.
pub struct FileLoginLog {
    path: PathBuf,
    // serializes appends so lines from concurrent sessions never interleave
    write_lock: tokio::sync::Mutex<()>,
}

impl FileLoginLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, entry: &str) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl LoginLog for FileLoginLog {
    async fn record(&self, username: &str, peer: SocketAddr) {
        let entry = format_entry(Local::now(), username, peer);
        if let Err(e) = self.append(&entry).await {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write login log");
        }
    }
}

/// Keeps entries in memory. Handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryLoginLog {
    entries: Mutex<Vec<(String, SocketAddr)>>,
}

impl MemoryLoginLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, SocketAddr)> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl LoginLog for MemoryLoginLog {
    async fn record(&self, username: &str, peer: SocketAddr) {
        self.entries.lock().push((username.to_string(), peer));
    }
}
