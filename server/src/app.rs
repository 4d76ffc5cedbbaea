//! Core application

use std::sync::Arc;

use anyhow::Result;
use prometheus_client::registry::Registry;

use crate::api::{ApiServer, StatsExposition};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::domain::stats::DescriptorRegistry;
use crate::domain::StatsCollector;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub collector: Arc<StatsCollector>,
    pub registry: Arc<Registry>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Stats) => {
                Self::print_known_stats();
                return Ok(());
            }
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config)?;
        Self::start_server(app).await
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let collector = Arc::new(StatsCollector::new(
            config.exporter.namespace.clone(),
            DescriptorRegistry::jvb(),
        ));
        let registry = Arc::new(StatsExposition::registry(collector.clone()));

        tracing::debug!(namespace = %collector.namespace(), "Stats collector initialized");

        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
            collector,
            registry,
        })
    }

    fn print_known_stats() {
        let registry = DescriptorRegistry::jvb();
        let mut entries: Vec<_> = registry.iter().collect();
        entries.sort_by_key(|(name, _)| *name);

        for (name, desc) in entries {
            let exported = if desc.stat_type.is_exported() {
                ""
            } else {
                " (not exported)"
            };
            println!("{:<32} {:<9}{}", name, desc.stat_type.as_str(), exported);
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &app.config.exporter.namespace,
            app.collector.registry().len(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;

        tracing::info!(sources = app.collector.sources().len(), "Exporter stopped");
        Ok(())
    }
}
