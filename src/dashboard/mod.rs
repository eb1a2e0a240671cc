mod dto;
pub mod handlers;
pub mod services;
mod templates;

pub use handlers::{api_routes, page_routes};
