mod client;
mod dto;

pub use client::ApiClient;
pub use dto::{CategoryDto, GridDto};
