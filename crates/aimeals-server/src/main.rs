mod configuration;
mod error;
mod routes;
mod state;

use aimeals::planner::MealPlanner;
use configuration::Settings;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = dotenv::dotenv() {
        eprintln!("Loaded environment from {}", path.display());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,aimeals=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::new()?;
    let addr = settings.server.socket_addr()?;
    info!(
        provider = %settings.provider.provider_type(),
        max_iterations = settings.agent.max_iterations,
        "loaded configuration"
    );

    let planner = MealPlanner::new(
        settings.provider.into_config(),
        settings.usda.into_config(),
    )
    .with_max_iterations(settings.agent.max_iterations);
    let state = state::AppState::new(planner)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
