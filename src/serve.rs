//! Local preview server for the built site.
//!
//! Serves `site/` over HTTP on `127.0.0.1:{port}` and optionally opens the
//! browser. This is the only async code in the crate; it runs on a Tokio
//! runtime created for the duration of the command.

use axum::Router;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Site not built yet: {0} does not exist. Run 'whisky-magazin build' first.")]
    SiteMissing(PathBuf),
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Router serving files from `site_dir`; `/` maps to `index.html`.
pub fn create_router(site_dir: &Path) -> Router {
    Router::new().fallback_service(ServeDir::new(site_dir).append_index_html_on_directories(true))
}

/// Serve `site_dir` until the process is interrupted.
pub fn serve(site_dir: &Path, port: u16, open_browser: bool) -> Result<(), ServeError> {
    if !site_dir.is_dir() {
        return Err(ServeError::SiteMissing(site_dir.to_path_buf()));
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let addr = format!("127.0.0.1:{port}");
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServeError::Bind {
                addr: addr.clone(),
                source,
            })?;

        let url = format!("http://{addr}");
        info!("Serving {} at {url}", site_dir.display());
        println!("Vorschau läuft unter {url}");
        println!("Strg+C beendet den Server.");

        if open_browser {
            if let Err(e) = open::that(&url) {
                warn!("Could not open browser: {e}");
            }
        }

        axum::serve(listener, create_router(site_dir)).await?;
        Ok::<(), ServeError>(())
    })
}
