mod categories;
mod time_entries;

pub use categories::*;
pub use time_entries::*;
