// GET handling: static files, directory listings, not found

use axum::{
    extract::{Query, Request, State},
    response::{Html, IntoResponse, Response},
};
use std::path::Path;
use tracing::{info, instrument};

use crate::server::{
    app::AppState,
    fs::{not_found_response, serve_static_file},
    render::{render_listing, ListingQuery, PageSelection},
    router::{route, RouteTarget},
};

/// dispatch a GET request by what the path names on disk
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn handle_get(
    State(state): State<AppState>,
    query: Option<Query<ListingQuery>>,
    request: Request,
) -> Response {
    let root = state.config.server.public_dir.clone();
    let uri_path = request.uri().path().to_string();
    info!("GET {}", request.uri());

    match route(&uri_path, &root, state.config.server.plus_as_space).await {
        RouteTarget::StaticFile(file_path) => serve_static_file(&root, &file_path, request).await,
        RouteTarget::Folder(dir_path) => {
            let query = query.map(|Query(q)| q).unwrap_or_default();
            list_directory(&state, &uri_path, &dir_path, &query).await
        }
        RouteTarget::NotFound => {
            info!("not found: {}", uri_path);
            not_found_response(&root).await
        }
    }
}

async fn list_directory(
    state: &AppState,
    uri_path: &str,
    dir_path: &Path,
    query: &ListingQuery,
) -> Response {
    let listing = state.listing_cache.snapshot(uri_path, dir_path).await;
    let selection = PageSelection::resolve(
        query,
        listing.max_page_id,
        state.config.listing.view_mode,
    );

    info!(
        "listing {} page {}/{} ({})",
        uri_path,
        selection.page_id,
        listing.max_page_id,
        selection.view_mode.as_str()
    );

    Html(render_listing(&listing, &selection, &state.config)).into_response()
}
