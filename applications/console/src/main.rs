/// Lectern - presentation console with projection sync
use clap::{Parser, Subcommand};
use lectern_console::{api, AppState, ConsoleConfig, Projector, SettingsStore};
use lectern_core::{AppMessage, SystemClock, SystemEvent};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Lectern presentation console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the control process
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "LECTERN_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Run a headless projection window
    Project {
        /// Control process socket
        #[arg(short, long, default_value = "ws://127.0.0.1:7420/ws/projection")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lectern=info,lectern_console=info,lectern_timer=info,lectern_media=info,lectern_projection=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Project { url } => {
            project(&url).await;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ConsoleConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Lectern console");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Best-effort settings
    let store = SettingsStore::new(config.settings.path.clone());
    let persisted = store.load().await;
    tracing::info!("Settings loaded from {}", store.path().display());

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    // Build application state
    let app_state = AppState::new(config, Arc::new(SystemClock), store, &persisted);
    if app_state.seed_timer(&persisted).await? {
        tracing::info!("Timer seeded from saved settings");
    }

    let app = api::create_router(app_state.clone());

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Tell any remaining windows before the sockets go away
    app_state
        .send_projection(AppMessage::system(SystemEvent::Shutdown), true)
        .await;
    app_state.projection.cancel_all().await;
    app_state.timer.shutdown();
    tracing::info!("Lectern console stopped");

    Ok(())
}

async fn project(url: &str) {
    let mut projector = Projector::new();

    tokio::select! {
        () = projector.run(url) => {}
        () = shutdown_signal() => {
            tracing::info!("Projector stopped");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
