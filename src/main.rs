use axum::{
    routing::{get, post},
    Router,
};
use order_reconciler::{api, AppConfig, OrderSystem, Reconciler, RestOrderSystem};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    let engine = Arc::new(Reconciler::new(config.engine.clone()));
    let erp: Arc<dyn OrderSystem> = Arc::new(RestOrderSystem::new(
        config.erp.base_url.clone(),
        config.erp.auth_token.clone(),
        config.erp.approved_status.clone(),
        config.erp.review_status.clone(),
    ));
    let state = api::AppState { engine, erp };

    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/reconcile", post(api::reconcile_order))
        .with_state(state)
        .layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/reconcile - validate one extracted order against the ERP");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
