pub(crate) mod categories;
pub(crate) mod error;
pub(crate) mod grid;

pub(crate) use error::ApiError;
