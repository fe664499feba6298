// shared test helpers
#![allow(dead_code)] // helpers are shared across multiple integration test crates

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use dirserve::{
    config::{AppConfig, ServerConfig},
    server::app::create_app,
};
use std::path::Path;

pub const BOUNDARY: &str = "----dirserve-boundary";

pub fn base_config(public_dir: &Path) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            public_dir: public_dir.canonicalize().unwrap(),
            write_404_page: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn app(config: AppConfig) -> axum::Router {
    create_app(config)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_range(uri: &str, range: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::RANGE, range)
        .body(Body::empty())
        .unwrap()
}

/// one file part of a multipart body
pub fn file_part(boundary: &str, field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    [
        format!("--{boundary}\r\n").as_bytes(),
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
        b"Content-Type: application/octet-stream\r\n\r\n",
        content,
        b"\r\n",
    ]
    .concat()
}

pub fn multipart_body(boundary: &str, parts: &[Vec<u8>]) -> Vec<u8> {
    let mut body = parts.concat();
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, boundary: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_string(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
