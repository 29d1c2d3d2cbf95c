pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
mod http;

pub use http::*;
