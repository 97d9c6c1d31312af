//! API server lifecycle — bind, spawn, graceful shutdown.
//!
//! Pattern: bind → spawn background task → return handle with shutdown
//! channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::conversation_router;
use crate::api::types::ApiContext;

/// Handle to a running API server.
pub struct ApiServer {
    pub local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Bind the conversation API to `addr` and serve it in a background task.
///
/// Returns a handle with the bound address (useful with port 0) and a
/// shutdown channel.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%local_addr, "API server binding");

    let app = conversation_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::types::CredentialRef;
    use crate::chat::MockChatApi;
    use crate::db::open_memory_database;
    use crate::secrets::MemorySecretStore;

    fn test_ctx() -> ApiContext {
        ApiContext::new(
            open_memory_database().unwrap(),
            Arc::new(
                MemorySecretStore::new()
                    .with_secret("prod/api/key/chatgpt", r#"{"api-key-chatgpt":"sk-test"}"#),
            ),
            Arc::new(MockChatApi::new("pong")),
            CredentialRef {
                secret_name: "prod/api/key/chatgpt".into(),
                secret_key: "api-key-chatgpt".into(),
            },
        )
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_server(test_ctx(), "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");

        assert!(server.local_addr.port() > 0);

        let url = format!("http://{}/health", server.local_addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        server.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn serves_conversation_round_over_http() {
        let mut server = start_server(test_ctx(), "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");

        let base = format!("http://{}", server.local_addr);
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/conversation"))
            .json(&serde_json::json!({"userKey": "u1", "chatQuestion": "ping?"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let turns: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(turns[0]["answer"], "pong");

        let resp = client
            .get(format!("{base}/conversation?userKey=u1"))
            .send()
            .await
            .unwrap();
        let turns: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(turns.as_array().unwrap().len(), 1);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server(test_ctx(), "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown();
    }
}
