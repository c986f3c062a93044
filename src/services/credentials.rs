use crate::error::CredentialError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

/// Username -> password table. Loaded once before the listener starts and only read afterwards.
///
/// Passwords are stored and compared as plain text, exactly as they appear in the source file.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: HashMap<String, String>,
}

impl CredentialStore {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref();

        let data = match tokio::fs::read_to_string(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CredentialError::Missing {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(CredentialError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let store = Self::parse(&data);
        tracing::info!(path = %path.display(), users = store.len(), "credentials loaded");
        Ok(store)
    }

    /// Parses `username:password` lines. Lines that do not split into exactly two
    /// fields are skipped; a later duplicate username replaces the earlier one.
    pub fn parse(data: &str) -> Self {
        let mut entries = HashMap::new();

        for line in data.lines() {
            let parts: Vec<&str> = line.split(':').collect();
            if let [username, password] = parts.as_slice() {
                entries.insert(username.to_string(), password.to_string());
            }
        }

        Self { entries }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.entries.get(username).is_some_and(|stored| stored == password)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_malformed_lines() {
        let store = CredentialStore::parse("alice:secretpw\nbob\ncarol:a:b\n\ndave:hunter2\r\n");
        assert_eq!(store.len(), 2);
        assert!(store.verify("alice", "secretpw"));
        assert!(store.verify("dave", "hunter2"));
        assert!(!store.verify("bob", ""));
        assert!(!store.verify("carol", "a:b"));
    }

    #[test]
    fn verify_is_exact() {
        let store = CredentialStore::parse("alice:secretpw");
        assert!(!store.verify("alice", "SECRETPW"));
        assert!(!store.verify("Alice", "secretpw"));
        assert!(!store.verify("alice", "secretpw "));
        assert!(!store.verify("mallory", "secretpw"));
    }

    #[test]
    fn empty_fields_are_kept() {
        let store = CredentialStore::parse(":nobody\nguest:");
        assert!(store.verify("", "nobody"));
        assert!(store.verify("guest", ""));
    }

    #[test]
    fn later_duplicate_wins() {
        let store = CredentialStore::parse("alice:old\nalice:new");
        assert_eq!(store.len(), 1);
        assert!(store.verify("alice", "new"));
        assert!(!store.verify("alice", "old"));
    }

    #[tokio::test]
    async fn load_missing_file_is_fatal_error() {
        let err = CredentialStore::load("/nonexistent/linegate/credentials.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::Missing { .. }));
    }

    #[tokio::test]
    async fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("linegate-creds-{}.txt", std::process::id()));
        tokio::fs::write(&path, "alice:secretpw\nbroken line\n").await.unwrap();

        let store = CredentialStore::load(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(store.len(), 1);
        assert!(store.verify("alice", "secretpw"));
    }
}
