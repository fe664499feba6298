// request handlers

pub mod browse;
pub mod upload;
