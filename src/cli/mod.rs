//! Terminal commands. Each opens the configured database directly and runs
//! against it synchronously, then prints a human-readable report.

pub mod discover;
pub mod health;
pub mod recall;
pub mod search;
pub mod store;

pub use discover::discover;
pub use health::health;
pub use recall::recall;
pub use search::search;
pub use store::store;
