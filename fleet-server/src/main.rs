use fleet_server::config::AppConfig;
use fleet_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fleet_server=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    info!(
        geocoder = %config
            .places_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| config.geocoder.base_url.clone()),
        osrm = %config.osrm.base_url,
        waypoints = %config.planner.waypoint_mode,
        "starting"
    );

    // Build app state
    let state = AppState::from_config(&config).expect("Failed to create clients");

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    info!("Fleet route planner listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET    /health                   - Health check");
    info!("  GET    /api/geocode?q=           - Resolve a place name");
    info!("  POST   /api/routes/estimate      - Compare route estimates");
    info!("  POST   /api/trips                - Plan a trip");
    info!("  GET    /api/trips/:id            - Fetch a planned trip");
    info!("  POST   /api/trips/:id/select     - Select a route and start tracking");
    info!("  GET    /api/trips/:id/tracking   - Live tracking snapshot");
    info!("  DELETE /api/trips/:id/tracking   - Stop tracking");

    axum::serve(listener, app).await.expect("Server error");
}
