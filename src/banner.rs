/// First line sent to every client after the connection is accepted.
pub const WELCOME: &str = "Welcome to the server. Please login.";
