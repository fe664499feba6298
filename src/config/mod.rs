// configuration module public api

pub mod loading;
pub mod types;

pub use loading::load_configuration;
pub use types::*;
