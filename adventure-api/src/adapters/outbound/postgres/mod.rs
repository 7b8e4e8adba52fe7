mod categories;
mod time_entries;

pub use categories::PostgresCategoryRepository;
pub use time_entries::PostgresTimeEntryRepository;
