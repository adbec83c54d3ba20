//! SQLite-Implementierung der Repositories

pub mod attempts;
pub mod pool;
pub mod users;

pub use pool::SqliteDb;
