mod backend;
mod extractor;
mod router;

pub use backend::AuthBackend;
pub use backend::AuthSession;
pub use backend::BackendError;
pub use extractor::AuthUser;
pub use router::router;
