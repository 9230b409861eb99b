//! application entry point

use crate::server::model::config::{RemoteConfig, ServerConfig};
use log::{info, warn};
use std::env;
use std::net::SocketAddrV4;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use derive_more::Display;

mod server;

const DOTENV_LOADING_FAILED_MSG: &str = "failed to load envs from dotenv files, aborting";
const HOST_PARSING_FAILED_MSG: &str = "failed to parse HOST, aborting";
const REMOTE_URL_MISSING_MSG: &str = "REMOTE_URL is not set, aborting";
const DEFAULT_HOST_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_REMOTE_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_FORM_IDLE_MINUTES: u64 = 120;

#[actix_web::main()]
async fn main() -> std::io::Result<()> {
    // bootstrap
    // a. env
    let env = env::var("APP_ENV")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Env::Dev); // default dev env if absent

    match env {
        Env::Prod | Env::Stg => {} // load in CI
        Env::Dev => {
            let path = Path::new(".env.dev");
            if path.exists() {
                dotenvy::from_path(path).expect(DOTENV_LOADING_FAILED_MSG);
            }
        }
    };

    // b. logging
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // c. run app
    let remote = RemoteConfig {
        url: env::var("REMOTE_URL").expect(REMOTE_URL_MISSING_MSG),
        api_key: env::var("REMOTE_API_KEY").unwrap_or_default(),
        timeout: Duration::from_secs(env_u64("REMOTE_TIMEOUT_SECONDS", DEFAULT_REMOTE_TIMEOUT_SECONDS)),
    };
    if remote.api_key.is_empty() {
        warn!("REMOTE_API_KEY is empty, remote calls will go out unauthenticated");
    }
    let default_session_id = env::var("ORDER_SESSION_ID")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let config = ServerConfig::new(
        SocketAddrV4::from_str(
            env::var("HOST")
                .unwrap_or(DEFAULT_HOST_ADDR.to_string())
                .as_str(),
        )
        .expect(HOST_PARSING_FAILED_MSG),
        remote,
        default_session_id,
        Duration::from_secs(env_u64("FORM_IDLE_MINUTES", DEFAULT_FORM_IDLE_MINUTES) * 60),
    );

    info!("App is starting in env={}, config={:?}", env, config);

    server::run(config).await
}

/// numeric env var, `default` when unset
fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key}={v} is not a number, aborting")),
        Err(_) => {
            info!("{} not set, using {}", key, default);
            default
        }
    }
}

#[derive(Debug, Display)]
#[non_exhaustive]
enum Env {
    Dev,
    Stg,
    Prod,
}

impl FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "stg" => Ok(Self::Stg),
            "prod" => Ok(Self::Prod),
            s => Err(format!("Invalid Env: {s}")),
        }
    }
}
