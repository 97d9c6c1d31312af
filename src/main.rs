use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use chatbridge::api::{start_server, ApiContext, CredentialRef};
use chatbridge::chat::OpenAiClient;
use chatbridge::config::{self, Settings};
use chatbridge::db;
use chatbridge::secrets::FileSecretStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let settings = Settings::from_env();
    tracing::info!("chatbridge starting v{}", config::APP_VERSION);

    if let Some(parent) = settings.database_path.parent() {
        std::fs::create_dir_all(parent).expect("Cannot create data directory");
    }
    let conn = db::open_database(&settings.database_path).expect("Cannot open conversation store");

    let ctx = ApiContext::new(
        conn,
        Arc::new(FileSecretStore::new(&settings.secrets_dir)),
        Arc::new(OpenAiClient::new(
            &settings.completions_url,
            &settings.model,
            settings.temperature,
            settings.chat_timeout_secs,
        )),
        CredentialRef {
            secret_name: settings.secret_name.clone(),
            secret_key: settings.secret_key.clone(),
        },
    );

    let mut server = start_server(ctx, settings.bind_addr)
        .await
        .expect("Cannot start API server");
    tracing::info!(addr = %server.local_addr, "chatbridge serving");

    tokio::signal::ctrl_c()
        .await
        .expect("Cannot listen for shutdown signal");
    server.shutdown();
}
