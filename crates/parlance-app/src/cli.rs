//! CLI argument definitions for the Parlance binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use parlance_core::config::ENV_CONFIG;

/// Parlance - a chat widget and the relay that connects it to a hosted
/// dialogue agent.
#[derive(Parser, Debug)]
#[command(name = "parlance", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the relay endpoint and serve the browser widget.
    Serve {
        /// Port to listen on.
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
    },
    /// Chat with the agent from the terminal through a running relay.
    Chat {
        /// Base URL of the relay, e.g. http://127.0.0.1:3030
        #[arg(long = "relay-url")]
        relay_url: Option<String>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > PARLANCE_CONFIG env var > ~/.parlance/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var(ENV_CONFIG) {
            if !p.trim().is_empty() {
                return PathBuf::from(p);
            }
        }
        default_config_path()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".parlance").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".parlance").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_with_port() {
        let args = CliArgs::parse_from(["parlance", "serve", "--port", "8080"]);
        match args.command {
            Command::Serve { port } => assert_eq!(port, Some(8080)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from([
            "parlance",
            "chat",
            "--relay-url",
            "http://localhost:4000",
            "--config",
            "/tmp/parlance.toml",
            "-l",
            "debug",
        ]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/parlance.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Command::Chat { relay_url } => {
                assert_eq!(relay_url.as_deref(), Some("http://localhost:4000"))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(["parlance"]).is_err());
    }
}
