use tracing_subscriber::EnvFilter;

use docscan_server::{app, AppState};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("docscan=info".parse().unwrap()),
        )
        .init();

    let config = docscan_core::AppConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }
    if !config.has_credential() {
        tracing::warn!("OPENAI_API_KEY is not set; requests must supply api_key");
    }

    let host = config.server_host.clone();
    let port = config.server_port;

    let state = AppState::new(config);
    let app = app(state);

    let addr = format!("{host}:{port}");
    tracing::info!("docscan server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
