mod routes;
mod store;

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::routes::{AppState, router};
use crate::store::SubmissionStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let addr = env_var_addr("CAPTURE_ADDR", "127.0.0.1:5000")?;
    let lakes_path = PathBuf::from(env_var_string("LAKES_PATH", "Lacs.json"));

    let store = SubmissionStore::open(&lakes_path).map_err(|e| e.to_string())?;
    if store.is_empty().await {
        info!(path = %lakes_path.display(), "starting with an empty submission list");
    } else {
        info!(
            path = %lakes_path.display(),
            entries = store.len().await,
            "resuming from existing submissions"
        );
    }

    let app = router(AppState {
        store: Arc::new(store),
    });

    info!("capture server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("bind {addr}: {e}"))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}

fn env_var_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_var_addr(key: &str, default: &str) -> Result<SocketAddr, String> {
    env_var_string(key, default)
        .parse()
        .map_err(|e| format!("invalid {key}: {e}"))
}
