use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_NAMESPACE, ENV_PORT};

#[derive(Parser)]
#[command(name = "jvb-exporter")]
#[command(version, about = "Prometheus exporter for Jitsi Videobridge MUC stats", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Metric namespace (prefix of every exported metric name)
    #[arg(long, short = 'n', global = true, env = ENV_NAMESPACE)]
    pub namespace: Option<String>,

    /// Enable debug mode (logs every received presence)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the exporter (default command)
    Start,
    /// Print the known stats and their metric types
    Stats,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub namespace: Option<String>,
    pub debug: bool,
    pub config: Option<PathBuf>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            namespace: cli.namespace,
            debug: cli.debug,
            config: cli.config,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "jvb-exporter",
            "--host",
            "127.0.0.1",
            "-p",
            "9100",
            "-n",
            "jitsi",
            "--debug",
        ])
        .unwrap();
        let config = CliConfig::from(cli);

        assert_eq!(config.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.port, Some(9100));
        assert_eq!(config.namespace.as_deref(), Some("jitsi"));
        assert!(config.debug);
        assert!(config.config.is_none());
    }

    #[test]
    fn test_parse_subcommand() {
        let cli = Cli::try_parse_from(["jvb-exporter", "stats"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Stats)));
    }

    #[test]
    fn test_parse_invalid_port() {
        assert!(Cli::try_parse_from(["jvb-exporter", "--port", "not-a-port"]).is_err());
    }
}
