mod error;
pub mod models;
pub mod ports;
pub mod services;
mod user;

pub use error::*;
pub use user::*;
