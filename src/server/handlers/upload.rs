// file upload handlers

use axum::{
    extract::{Multipart, OriginalUri, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

use crate::server::{
    app::AppState,
    fs::not_found_response,
    render::render_upload_result,
    router::{route, RouteTarget},
    uploads::{handle_upload, UploadedFile},
};

/// accept a multipart upload into the directory named by the request path
#[instrument(skip(state, multipart, uri), fields(path = %uri.path()))]
pub async fn handle_post(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    mut multipart: Multipart,
) -> Result<Response, StatusCode> {
    info!("processing upload request");

    // verify uploads are enabled
    if !state.config.server.enable_upload {
        warn!("upload attempt but uploads are disabled");
        return Err(StatusCode::FORBIDDEN);
    }

    let root = &state.config.server.public_dir;
    let dir_path = match route(uri.path(), root, state.config.server.plus_as_space).await {
        RouteTarget::Folder(dir_path) => dir_path,
        _ => {
            warn!("upload target is not a directory");
            return Ok(not_found_response(root).await);
        }
    };

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("failed to read multipart field: {}", e);
        e.status()
    })? {
        // plain form fields carry no file name
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field.bytes().await.map_err(|e| {
            error!("failed to read upload {:?}: {}", file_name, e);
            e.status()
        })?;

        info!("received {:?}: {} bytes", file_name, data.len());
        files.push(UploadedFile { file_name, data });
    }

    if files.is_empty() {
        warn!("no file found in upload request");
        return Err(StatusCode::BAD_REQUEST);
    }

    let outcomes = handle_upload(&dir_path, files).await;
    Ok(Html(render_upload_result(uri.path(), &outcomes)).into_response())
}
