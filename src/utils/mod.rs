// shared helpers

pub mod files;
pub mod media;
pub mod net;
pub mod paths;
