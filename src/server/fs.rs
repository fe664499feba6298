// static-file delegate and not-found page

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, info, warn};

use super::assets::not_found_page;

pub const NOT_FOUND_PAGE: &str = "404.html";

/// write the generated 404 page into the served root
pub fn write_not_found_page(root_dir: &Path) -> Result<PathBuf> {
    let target = root_dir.join(NOT_FOUND_PAGE);
    std::fs::write(&target, not_found_page())
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!("wrote not-found page: {}", target.display());
    Ok(target)
}

/// serve a regular file through the tower-http static file service
pub async fn serve_static_file(root_dir: &Path, file_path: &Path, request: Request) -> Response {
    debug!("delegating to static file service: {}", file_path.display());

    let response = match ServeFile::new(file_path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    // the file vanished between routing and serving
    if response.status() == StatusCode::NOT_FOUND {
        return not_found_response(root_dir).await;
    }

    response.map(Body::new).into_response()
}

/// 404 response using the served root's `404.html`, or the embedded copy
pub async fn not_found_response(root_dir: &Path) -> Response {
    let page = match tokio::fs::read(root_dir.join(NOT_FOUND_PAGE)).await {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!("no 404 page in served root ({}), using embedded copy", err);
            not_found_page().into_owned()
        }
    };

    match Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(page))
    {
        Ok(response) => response,
        Err(err) => {
            warn!("failed to build not-found response: {}", err);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
