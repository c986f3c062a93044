use anyhow::Context;
use clap::Parser;
use linegate::Registry;
use linegate::config::Config;
use linegate::error::CredentialError;
use linegate::net::tcp;
use linegate::services::{
    BlockHook, CommandBlockHook, CredentialStore, FileLoginLog, LockoutTracker, LogBlockHook, UptimeClock,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Exit status when the credential file is absent. Distinct from the generic failure status 1.
const EXIT_CREDENTIALS_MISSING: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "linegate", version, about = "Line-oriented TCP command server")]
struct Args {
    /// Read configuration from this TOML file instead of the environment
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen address (eg: "0.0.0.0:8888")
    #[arg(long)]
    listen: Option<String>,

    /// Override the credential file (username:password per line)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Override the login log file
    #[arg(long)]
    login_log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let uptime = UptimeClock::start();
    init_tracing();

    let args = Args::parse();

    match run(args, uptime).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(CredentialError::Missing { path }) = e.downcast_ref::<CredentialError>() {
                eprintln!(
                    "Credentials file not found. Please create a file named '{}' with username:password entries.",
                    path.display()
                );
                return ExitCode::from(EXIT_CREDENTIALS_MISSING);
            }
            tracing::error!(error = ?e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, uptime: UptimeClock) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;

    // Fatal when missing; nothing is bound yet
    let credentials = CredentialStore::load(&cfg.credentials_path).await?;
    tracing::info!(path = %cfg.credentials_path.display(), users = credentials.len(), "credentials loaded");

    let block_hook: Arc<dyn BlockHook> = match &cfg.block_command {
        Some(template) => Arc::new(CommandBlockHook::new(template.clone())),
        None => Arc::new(LogBlockHook),
    };

    let registry = Arc::new(Registry::new(
        credentials,
        LockoutTracker::new(cfg.block_threshold),
        uptime,
        Arc::new(FileLoginLog::new(&cfg.login_log_path)),
        block_hook,
    ));

    let tcp_addr = cfg.socket_addr()?;
    let listener = tcp::bind(tcp_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server started. Waiting for connections...");

    tokio::select! {
        res = tcp::serve(listener, registry) => res?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutdown requested"),
    }

    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::from_env()?,
    };

    // allow overriding individual settings from the CLI
    if let Some(listen) = &args.listen {
        cfg.tcp_addr = listen.clone();
    }
    if let Some(path) = &args.credentials {
        cfg.credentials_path = path.clone();
    }
    if let Some(path) = &args.login_log {
        cfg.login_log_path = path.clone();
    }

    Ok(cfg)
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, prelude::*};

    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,linegate=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_error::ErrorLayer::default())
        .init();
}
