//! Command tokenizer for the line protocol.
//!
//! A line is split on every single space, so repeated spaces produce empty tokens
//! and an empty line produces one empty token. Only the first token selects the
//! verb, and matching is exact and case-sensitive.
//!
//! Examples:
//!   "login alice secret"   -> Verb::Login, args=["login", "alice", "secret"]
//!   "login  alice secret"  -> Verb::Login, args=["login", "", "alice", "secret"]
//!   "WHO"                  -> Verb::Unknown("WHO")
//!   ""                     -> Verb::Unknown("")

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Login,
    Who,
    Uptime,
    Stats,
    Exit,
    /// First token did not match any known command
    Unknown(String),
}

impl Verb {
    pub fn from_token(token: &str) -> Self {
        match token {
            "login" => Verb::Login,
            "who" => Verb::Who,
            "uptime" => Verb::Uptime,
            "stats" => Verb::Stats,
            "exit" => Verb::Exit,
            other => Verb::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Verb::Login => "login",
            Verb::Who => "who",
            Verb::Uptime => "uptime",
            Verb::Stats => "stats",
            Verb::Exit => "exit",
            Verb::Unknown(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub verb: Verb,
    /// Every token of the line, the verb itself at index 0
    pub args: Vec<String>,
}

pub fn parse_command(raw: &str) -> Intent {
    let args: Vec<String> = raw.split(' ').map(str::to_string).collect();
    // split() always yields at least one item
    let verb = Verb::from_token(&args[0]);

    Intent { verb, args }
}
