use gamevault_api::{app, config, database, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamevault_api=debug,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting GameVault API in {:?} mode", config.environment);

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = database::connect(&database_url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    let router = app::build_router(AppState::new(pool));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);
    let bind_addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("GameVault API listening on http://{}", bind_addr);

    axum::serve(listener, router).await.expect("server");
}
