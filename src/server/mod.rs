// server module public api

pub mod app;
pub mod assets;
pub mod cache;
pub mod fs;
pub mod handlers;
pub mod render;
pub mod router;
pub mod uploads;

pub use app::{create_app, start_server};
