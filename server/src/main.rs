mod http;

use env_logger::Env;
use http::{ClipboardBackend, Config};
use log::{error, info};
use payment_lookup::{
    Clipboard, ClipboardRelay, LookupController, MemoryClipboard, PaymentClient, SystemClipboard,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    let client = PaymentClient::new(config.cardapio.api_url.clone());
    info!("Payment methods endpoint: {}", client.endpoint());

    let clipboard: Arc<dyn Clipboard> = match config.clipboard_backend {
        ClipboardBackend::System => Arc::new(SystemClipboard),
        ClipboardBackend::Memory => Arc::new(MemoryClipboard::new()),
    };

    let state = http::router::AppState {
        lookup: Arc::new(LookupController::new(client, config.cardapio.demo_api_key())),
        clipboard: Arc::new(ClipboardRelay::new(clipboard)),
    };
    let app = http::router::build_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Preview server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
