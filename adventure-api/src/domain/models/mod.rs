mod category;
mod grid;
mod ids;
mod time_entry;

pub use category::*;
pub use grid::*;
pub use ids::*;
pub use time_entry::*;
