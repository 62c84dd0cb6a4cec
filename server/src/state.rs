use std::{sync::Arc, time::Duration};

use redis::aio::ConnectionManager;
use reqwest::Client;
use tokio::sync::broadcast;
use tracing::warn;

use super::{
    config::Config,
    database::{init_redis, seed_categories},
};

pub struct AppState {
    pub config: Config,
    pub redis_connection: ConnectionManager,
    pub http_client: Client,
    pub updates: broadcast::Sender<()>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let mut redis_connection = init_redis(&config.redis_url).await;

        if let Err(e) = seed_categories(&mut redis_connection).await {
            warn!("Failed to seed default categories: {e}");
        }

        // AC servers commonly run with self-signed certificates
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .danger_accept_invalid_certs(true)
            .build()
            .expect("HTTP client misconfigured!");

        let (updates, _) = broadcast::channel(16);

        Arc::new(Self {
            config,
            redis_connection,
            http_client,
            updates,
        })
    }
}
