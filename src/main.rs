use campus::logging::init_tracing;
use campus::metrics::init_metrics;
use campus::router::init_router_with_metrics;
use campus::state::init_app_state;
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let metrics = init_metrics()?;

    let state = init_app_state().await;
    if let Err(e) = campus_db::run_migrations(&state.db).await {
        error!(error = %e, "Failed to run migrations");
        return Err(e.into());
    }

    let app = init_router_with_metrics(state, metrics);

    let port = campus::config::port_from_env();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;

    info!("Server running on http://localhost:{port}");
    info!("Swagger UI available at http://localhost:{port}/swagger-ui");
    info!("Scalar UI available at http://localhost:{port}/scalar");

    axum::serve(listener, app).await?;
    Ok(())
}
