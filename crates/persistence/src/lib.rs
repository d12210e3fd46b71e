//! PetShop Persistence - Client state kept across restarts

pub mod sqlite;

pub use sqlite::Database;
