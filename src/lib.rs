pub mod banner;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod net;
pub mod services;
pub mod state;

// Convenient re-exports (so call sites can do `linegate::Registry`, etc.)
pub use commands::{dispatch_line, process_command};
pub use state::{
    registry::{Registry, SessionRegistry},
    session::{Session, SessionId},
};
