//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::time::Duration;

use crate::core::{Config, Result, ServerError, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = crate::api::build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Installment server listening on {}", addr);

        let timeout = Duration::from_millis(self.config.shutdown_timeout_ms);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let serve = async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Shutting down...");
                    let _ = tx.send(());
                })
                .await
        };

        // 收到关闭信号后，最多等待 shutdown_timeout_ms 让进行中的请求完成
        tokio::select! {
            res = serve => res.map_err(ServerError::Io)?,
            _ = async {
                let _ = rx.await;
                tokio::time::sleep(timeout).await;
            } => {
                tracing::warn!(timeout_ms = self.config.shutdown_timeout_ms, "Graceful shutdown timed out");
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}
