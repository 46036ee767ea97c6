use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use ayah_widget::catalog::Catalog;
use ayah_widget::config::Config;
use ayah_widget::infra::build_service;
use ayah_widget::observability::{self, metrics};
use ayah_widget::scheduler::{install_schedule, TokioScheduler};
use ayah_widget::selection::CategoryFallback;
use ayah_widget::server;

#[derive(Parser)]
#[command(name = "ayah_widget")]
#[command(about = "Rotating Quran verse API with a server-rendered page")]
#[command(version)]
struct Cli {
    /// Optional TOML config file; environment variables override it
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server with scheduled refreshes (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Do not register the timed refresh jobs
        #[arg(long)]
        no_scheduler: bool,
    },
    /// Fetch one verse and print it as JSON
    Fetch {
        #[arg(long)]
        category: Option<String>,
    },
    /// List categories and their sizes
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    observability::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config).context("loading configuration")?;
    let catalog = Arc::new(Catalog::builtin());
    config.validate(&catalog)?;

    if let Some(port) = config.metrics_port {
        metrics::init_exporter(port);
    }

    let service = Arc::new(build_service(&config, catalog));

    match cli.command.unwrap_or(Commands::Serve { port: None, no_scheduler: false }) {
        Commands::Serve { port, no_scheduler } => {
            if service.image_configured() {
                info!("Unsplash API configured for background images");
            } else {
                warn!("No Unsplash API key configured, using gradient backgrounds");
            }

            if config.schedule.refresh_on_start {
                let warm = service.clone();
                tokio::spawn(async move {
                    match warm.refresh(None, CategoryFallback::Random).await {
                        Ok(_) => info!("Server initialized with first ayah"),
                        Err(e) => error!(error = %e, "Failed to initialize server with ayah"),
                    }
                });
            }

            // Jobs stop when the scheduler is dropped, so it lives until the server exits
            let mut scheduler = TokioScheduler::new();
            if !no_scheduler {
                install_schedule(&mut scheduler, service.clone(), &config.schedule);
            }

            server::start_server(service, port.unwrap_or(config.port)).await?;
            scheduler.shutdown();
        }
        Commands::Fetch { category } => {
            let verse = service
                .refresh(category.as_deref(), CategoryFallback::Strict)
                .await?;
            println!("{}", serde_json::to_string_pretty(&verse.record)?);
        }
        Commands::Categories => {
            for summary in service.categories().categories {
                println!("{:<12} {}", summary.name, summary.count);
            }
        }
    }

    Ok(())
}
