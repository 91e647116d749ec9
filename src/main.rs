use clap::Parser;
use mcp_apps_rust::assets::AssetsDir;
use mcp_apps_rust::auth::StaticTokenVerifier;
use mcp_apps_rust::cart::{register_cart_widgets, CartStore};
use mcp_apps_rust::config::ServerConfig;
use mcp_apps_rust::router::create_app_router;
use mcp_apps_rust::state::AppState;
use mcp_apps_rust::telemetry;
use mcp_apps_rust::widget::WidgetServer;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();

    if let Err(error) = telemetry::initialise(&config.log_filter, config.log_format) {
        eprintln!("{}", error);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "server terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Widget server: registry plus server-wide auth policy
    let server = Arc::new(WidgetServer::new(config.policy()));

    let assets = config
        .assets_dir
        .clone()
        .map(AssetsDir::new)
        .unwrap_or_else(AssetsDir::locate);
    tracing::info!(assets = %assets.root().display(), "using assets directory");

    register_cart_widgets(server.registry(), Arc::new(CartStore::new()), &assets).await?;

    let verifier = Arc::new(StaticTokenVerifier::new(config.token_table()));
    let state = Arc::new(AppState::new(
        Arc::clone(&server),
        verifier,
        config.advertise_ui_extension(),
    ));

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    let addr = config.socket_addr();
    tracing::info!(
        %addr,
        widgets = server.registry().len(),
        requires_auth = server.policy().requires_auth,
        "server running"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
