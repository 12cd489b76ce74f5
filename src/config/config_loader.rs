use anyhow::{Result, anyhow};

use super::config_model::{Database, DotEnvyConfig, Server, WebhookSecret};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    Ok(DotEnvyConfig { server, database })
}

pub fn get_webhook_secret() -> Result<WebhookSecret> {
    dotenvy::dotenv().ok();

    Ok(WebhookSecret {
        token: std::env::var("WEBHOOK_SHARED_SECRET")
            .expect("WEBHOOK_SHARED_SECRET is invalid"),
    })
}

/// The backfill runner must fail fast with a readable message instead of
/// panicking, so the store credential is checked explicitly.
pub fn get_backfill_database_url() -> Result<String> {
    dotenvy::dotenv().ok();

    std::env::var("DATABASE_URL")
        .map_err(|_| anyhow!("DATABASE_URL must be set to run the backfill"))
}
