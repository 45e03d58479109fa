//! Serve command implementation: a read-only file server over the published
//! tree.
//!
//! The version pointer is read on every request; combined with the build's
//! write-then-repoint-then-delete ordering, a request observes either the
//! new complete tree or the immediately prior one, never a torn version.

use anyhow::{Context, Result};
use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tower_http::{services::ServeDir, trace::TraceLayer};
use vellum_core::{Config, POINTER_FILE};

#[derive(Clone)]
struct AppState {
    output_dir: PathBuf,
}

/// Start the blog server
pub async fn serve_site(config_path: &Path, port: Option<u16>) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let port = port.unwrap_or(config.server.port);
    let output_dir = config.output_dir();

    let app = Router::new()
        .route("/blog/{slug}/", get(serve_article))
        .route("/sitemap.xml", get(serve_sitemap))
        .nest_service("/assets", ServeDir::new(output_dir.join("assets")))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { output_dir });

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Serving on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Resolve the current version, then the article file below it.
///
/// 404 only when the page file itself is absent; any other failure
/// (unreadable pointer included) is a 500.
async fn serve_article(State(state): State<AppState>, AxumPath(slug): AxumPath<String>) -> Response {
    // One path segment; refuse anything that could climb out of the tree
    if slug.is_empty() || slug == "." || slug == ".." {
        return StatusCode::NOT_FOUND.into_response();
    }

    let version = match fs::read_to_string(state.output_dir.join(POINTER_FILE)).await {
        Ok(value) => value.trim().to_string(),
        Err(err) => {
            tracing::error!("Failed to read version pointer: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let page = state
        .output_dir
        .join(&version)
        .join(&slug)
        .join("index.html");
    match fs::read(&page).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Article not found: {} (version {})", slug, version);
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            tracing::error!("Failed to read {:?}: {}", page, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The sitemap lives at a fixed, non-versioned path in the output root
async fn serve_sitemap(State(state): State<AppState>) -> Response {
    match fs::read(state.output_dir.join("sitemap.xml")).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            tracing::error!("Failed to read sitemap: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
