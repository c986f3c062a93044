use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Connection order id. Assigned by the acceptor, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    /// Remote end of the connection
    peer: SocketAddr,
    /// Set on successful login
    username: Option<String>,
}

impl Session {
    pub fn new(id: SessionId, peer: SocketAddr) -> Self {
        Self {
            id,
            peer,
            username: None,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn ip(&self) -> IpAddr {
        self.peer.ip()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn login(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_anonymous() {
        let s = Session::new(SessionId(1), "10.1.2.3:5555".parse().unwrap());
        assert!(!s.is_logged_in());
        assert_eq!(s.username(), None);
        assert_eq!(s.ip().to_string(), "10.1.2.3");
        assert_eq!(s.id.to_string(), "#1");
    }

    #[test]
    fn login_sets_username() {
        let mut s = Session::new(SessionId(2), "[::1]:9".parse().unwrap());
        s.login("alice");
        assert!(s.is_logged_in());
        assert_eq!(s.username(), Some("alice"));
    }
}
