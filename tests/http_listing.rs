// directory listing, pagination and view modes

mod support;

use axum::http::StatusCode;
use support::{app, base_config, body_string, get};
use tempfile::TempDir;
use tower::ServiceExt;

use std::fs;
use std::time::Duration;

fn populate(dir: &std::path::Path, count: usize) {
    for i in 0..count {
        fs::write(dir.join(format!("file{i:03}.txt")), format!("{i}")).unwrap();
    }
}

#[tokio::test]
async fn lists_directory_contents_with_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();

    fs::write(public_dir.join("Beta.txt"), "hello").unwrap();
    fs::write(public_dir.join("alpha.md"), vec![b'x'; 2048]).unwrap();
    fs::create_dir(public_dir.join("gamma")).unwrap();

    let app = app(base_config(public_dir));
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Directory: /"));
    assert!(body.contains("3 items in total, 2 files, 1 folders"));
    assert!(body.contains("<td>.md</td>"));
    assert!(body.contains("<td>2.000 KB</td>"));
    assert!(body.contains("<td>DIR</td>"));
    assert!(body.contains("href=\"/gamma/\""));

    // case-insensitive order: alpha, Beta, gamma
    let alpha = body.find(">alpha.md<").unwrap();
    let beta = body.find(">Beta.txt<").unwrap();
    let gamma = body.find(">gamma<").unwrap();
    assert!(alpha < beta && beta < gamma);
}

#[tokio::test]
async fn escapes_entry_links_and_follows_them() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();

    fs::create_dir_all(public_dir.join("my docs/sub dir")).unwrap();
    fs::write(public_dir.join("my docs/report #1.txt"), "report").unwrap();

    let app = app(base_config(public_dir));

    let response = app.clone().oneshot(get("/")).await.unwrap();
    let body = body_string(response).await;
    assert!(body.contains("href=\"/my%20docs/\""));
    assert!(body.contains(">my docs<"));

    let response = app.clone().oneshot(get("/my%20docs/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Directory: /my docs/"));
    assert!(body.contains("href=\"/my%20docs/report%20%231.txt\""));
    assert!(body.contains("href=\"/my%20docs/sub%20dir/\""));
    assert!(body.contains("<a href=\"/\">Go to Parent Dir</a>"));

    let response = app.oneshot(get("/my%20docs/report%20%231.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "report");
}

#[tokio::test]
async fn lists_directories_requested_without_trailing_slash() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();

    fs::create_dir(public_dir.join("docs")).unwrap();
    fs::write(public_dir.join("docs/readme.txt"), "r").unwrap();

    let app = app(base_config(public_dir));
    let response = app.oneshot(get("/docs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("href=\"/docs/readme.txt\""));
}

#[tokio::test]
async fn paginates_large_directories() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();
    populate(public_dir, 125);

    let app = app(base_config(public_dir));

    let body = body_string(app.clone().oneshot(get("/")).await.unwrap()).await;
    assert!(body.contains("show 50 items per page, 3 pages"));
    assert!(body.contains(">file000.txt<"));
    assert!(body.contains(">file049.txt<"));
    assert!(!body.contains(">file050.txt<"));
    assert!(body.contains("href=\"/?page_id=2&amp;view_mode=list\""));

    let body = body_string(app.clone().oneshot(get("/?page_id=3")).await.unwrap()).await;
    assert!(!body.contains(">file099.txt<"));
    assert!(body.contains(">file100.txt<"));
    assert!(body.contains(">file124.txt<"));
    assert!(body.contains("<span>Next&gt;</span>"));

    // out of range and malformed pages fall back to the first page
    for query in ["/?page_id=4", "/?page_id=0", "/?page_id=-1", "/?page_id=abc"] {
        let body = body_string(app.clone().oneshot(get(query)).await.unwrap()).await;
        assert!(body.contains(">file000.txt<"), "{query} did not reset to page 1");
        assert!(body.contains("<span>&lt;Prev</span>"));
    }
}

#[tokio::test]
async fn honors_configured_items_per_page() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();
    populate(public_dir, 7);

    let mut config = base_config(public_dir);
    config.listing.items_per_page = 3;

    let app = app(config);
    let body = body_string(app.oneshot(get("/?page_id=3")).await.unwrap()).await;

    assert!(body.contains("show 3 items per page, 3 pages"));
    assert!(body.contains(">file006.txt<"));
    assert!(!body.contains(">file005.txt<"));
}

#[tokio::test]
async fn switches_between_list_and_preview() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();

    fs::write(public_dir.join("cat.jpg"), "img").unwrap();
    fs::write(public_dir.join("clip.ogg"), "ogg").unwrap();
    fs::write(public_dir.join("talk.webm"), "webm").unwrap();

    let mut config = base_config(public_dir);
    config.listing.image_width = 200;
    let app = app(config);

    let body = body_string(app.clone().oneshot(get("/")).await.unwrap()).await;
    assert!(body.contains("<table class=\"list\">"));
    assert!(body.contains("href=\"/?view_mode=preview\""));

    let body = body_string(
        app.clone()
            .oneshot(get("/?view_mode=preview&page_id=1"))
            .await
            .unwrap(),
    )
    .await;
    assert!(body.contains("<table class=\"grid\">"));
    assert!(body.contains("<img src=\"/cat.jpg\" width=\"200\""));
    assert!(body.contains("<audio controls preload=\"none\" src=\"/clip.ogg\">"));
    assert!(body.contains("<video controls preload=\"metadata\" width=\"200\" src=\"/talk.webm\">"));
    assert!(body.contains("href=\"/?view_mode=list&amp;page_id=1\""));

    // unknown modes fall back to the configured default
    let body = body_string(app.oneshot(get("/?view_mode=gallery")).await.unwrap()).await;
    assert!(body.contains("<table class=\"list\">"));
}

#[tokio::test]
async fn preview_can_be_the_default_mode() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();
    fs::write(public_dir.join("a.png"), "png").unwrap();

    let mut config = base_config(public_dir);
    config.listing.view_mode = dirserve::config::ViewMode::Preview;

    let app = app(config);
    let body = body_string(app.oneshot(get("/")).await.unwrap()).await;
    assert!(body.contains("<table class=\"grid\">"));
    assert!(body.contains("href=\"/?view_mode=list\""));
}

#[tokio::test]
async fn empty_directory_shows_placeholder() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();
    fs::create_dir(public_dir.join("empty")).unwrap();

    let app = app(base_config(public_dir));
    let body = body_string(app.oneshot(get("/empty/")).await.unwrap()).await;

    assert!(body.contains("Nothing under this directory"));
    assert!(!body.contains("<table"));
}

#[tokio::test]
async fn listing_reflects_directory_changes() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();
    fs::write(public_dir.join("first.txt"), "1").unwrap();

    let app = app(base_config(public_dir));

    let body = body_string(app.clone().oneshot(get("/")).await.unwrap()).await;
    assert!(body.contains("1 items in total"));
    assert!(!body.contains("second.txt"));

    // give the directory mtime room to move past the cached value
    tokio::time::sleep(Duration::from_millis(50)).await;
    fs::write(public_dir.join("second.txt"), "2").unwrap();

    let body = body_string(app.oneshot(get("/")).await.unwrap()).await;
    assert!(body.contains("2 items in total"));
    assert!(body.contains(">second.txt<"));
}

#[cfg(unix)]
#[tokio::test]
async fn lists_dangling_symlinks() {
    let temp_dir = TempDir::new().unwrap();
    let public_dir = temp_dir.path();
    std::os::unix::fs::symlink(public_dir.join("nowhere"), public_dir.join("broken")).unwrap();

    let app = app(base_config(public_dir));
    let body = body_string(app.oneshot(get("/")).await.unwrap()).await;

    assert!(body.contains(">broken<"));
    assert!(body.contains("<td>SYMLINK</td>"));
    assert!(body.contains("<td>-</td>"));
}
