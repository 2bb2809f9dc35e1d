use log::*;
pub use service::AppState;
use tokio::net::TcpListener;

mod controller;
mod error;
mod extractors;
mod params;
pub mod router;

pub use error::{Error, ErrorResponse, Result};

/// Bind the configured interface and port, then serve requests until the listener fails.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let config = app_state.config_ref();
    let interface = config.interface.as_deref().unwrap_or("0.0.0.0");
    let host = format!("{interface}:{}", config.port);

    let listener = TcpListener::bind(&host).await?;
    info!("Teams meeting service listening on http://{host}");

    axum::serve(listener, router::define_routes(app_state)).await
}
