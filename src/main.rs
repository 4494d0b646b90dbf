// Main entry point - Dependency injection, proxy server and terminal monitor
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::io::IsTerminal;
use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::application::map_renderer::{MapLoader, MapView, MarkerRenderer, TileLayer};
use crate::application::polling_controller::PollingController;
use crate::application::proxy_service::{ProxyService, ProxyTarget};
use crate::domain::filters::FilterSet;
use crate::domain::polling::{is_valid_interval, PollingState, MAX_INTERVAL_SECS};
use crate::infrastructure::config::{load_settings, Settings};
use crate::infrastructure::geojson_map::GeoJsonMapLoader;
use crate::infrastructure::log_map::LogMapLoader;
use crate::infrastructure::proxy_client::ProxyDashboardClient;
use crate::infrastructure::upstream_client::HttpUpstream;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;
use crate::presentation::monitor::Monitor;

#[derive(Parser)]
#[command(name = "disaster-shield")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "DisasterShield hazard monitoring: API proxy and real-time terminal dashboard")]
struct Cli {
    /// Settings file (defaults to config/shield.toml when present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP proxy in front of the statistics API
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,
        /// Base URL of the upstream API
        #[arg(long)]
        upstream: Option<String>,
    },

    /// Poll the proxy and render the dashboard in the terminal
    Monitor {
        /// Base URL of the proxy
        #[arg(long)]
        proxy_url: Option<String>,
        /// Seconds between automatic refreshes
        #[arg(short, long)]
        interval: Option<u64>,
        /// Start with real-time updates paused
        #[arg(long)]
        paused: bool,
        /// Write hotspot markers to this GeoJSON file
        #[arg(long)]
        map_output: Option<String>,
        /// Initial filters as key=value (fromDate, toDate, radiusKm, centerLat, centerLng)
        #[arg(short = 'f', long = "filter")]
        filters: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind, upstream } => {
            init_tracing(false);
            if let Some(bind) = bind {
                settings.server.bind = bind;
            }
            if let Some(upstream) = upstream {
                settings.upstream.base_url = upstream;
            }
            serve(settings).await
        }
        Commands::Monitor {
            proxy_url,
            interval,
            paused,
            map_output,
            filters,
        } => {
            init_tracing(true);
            if let Some(proxy_url) = proxy_url {
                settings.monitor.proxy_url = proxy_url;
            }
            if let Some(interval) = interval {
                settings.monitor.interval_secs = interval;
            }
            if paused {
                settings.monitor.realtime = false;
            }
            if map_output.is_some() {
                settings.map.output = map_output;
            }
            monitor(settings, &filters).await
        }
    }
}

/// Monitor mode logs to stderr so the dashboard owns stdout
fn init_tracing(to_stderr: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("disaster_shield=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if to_stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    // Create gateway (infrastructure layer)
    let timeout = settings.upstream.timeout_secs.map(Duration::from_secs);
    let gateway = Arc::new(HttpUpstream::new(timeout)?);

    // Create services (application layer)
    let proxy_service = ProxyService::new(
        gateway,
        ProxyTarget {
            base_url: settings.upstream.base_url.clone(),
            placeholder_authorization: settings.upstream.placeholder_authorization,
        },
    );

    let state = Arc::new(AppState {
        proxy_service,
        dashboard_tip: settings.proxy.dashboard_tip,
        passthrough_tip: settings.proxy.passthrough_tip,
    });

    // Build router (presentation layer)
    let app = router(state);

    let addr: SocketAddr = settings
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server.bind))?;
    tracing::info!(%addr, upstream = %settings.upstream.base_url, "Starting DisasterShield proxy");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}

async fn monitor(settings: Settings, filter_args: &[String]) -> anyhow::Result<()> {
    let mut filters = FilterSet::new();
    for arg in filter_args {
        let (key, value) = arg
            .split_once('=')
            .with_context(|| format!("filter '{}' must be key=value", arg))?;
        filters.set(key, value)?;
    }

    if !is_valid_interval(settings.monitor.interval_secs) {
        anyhow::bail!(
            "monitor.interval_secs must be between 1 and {}",
            MAX_INTERVAL_SECS
        );
    }

    let source = Arc::new(ProxyDashboardClient::new(settings.monitor.proxy_url.clone()));
    let polling = PollingState::new(settings.monitor.realtime, settings.monitor.interval_secs);
    let controller = PollingController::new(source, polling, filters);

    // The map binding is picked here; the renderer only knows the traits
    let loader: Arc<dyn MapLoader> = match &settings.map.output {
        Some(path) => Arc::new(GeoJsonMapLoader::new(path)),
        None => Arc::new(LogMapLoader),
    };
    let renderer = MarkerRenderer::new(
        loader,
        MapView::default(),
        TileLayer {
            url_template: settings.map.tile_url,
            attribution: settings.map.attribution,
        },
    );

    tracing::info!(proxy = %settings.monitor.proxy_url, "Starting DisasterShield monitor");

    let stdout = std::io::stdout();
    let clear_screen = stdout.is_terminal();
    let mut output = stdout.lock();
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    Monitor::new(controller, renderer, clear_screen)
        .run(BufReader::new(tokio::io::stdin()), &mut output, shutdown)
        .await?;

    Ok(())
}
