// dirserve: browsable http file server with paginated listings and uploads

pub mod config;
pub mod server;
pub mod utils;
