use axum::Router;
use std::net::SocketAddr;
use tokio::task::JoinHandle;

const DEFAULT_PORT: u16 = 3000;

pub(crate) fn listen_port() -> Result<u16, std::num::ParseIntError> {
    match std::env::var("PORT") {
        Ok(port) if !port.trim().is_empty() => port.trim().parse(),
        _ => Ok(DEFAULT_PORT),
    }
}

pub(crate) fn spawn_http_server(port: u16, app: Router) -> JoinHandle<()> {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!("HTTP server listening on {}", addr);
        if let Err(e) = axum_server::bind(addr)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("HTTP server failed: {}", e);
        }
    })
}
