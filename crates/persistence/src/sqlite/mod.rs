//! SQLite database management

mod client_state;
mod connection;

pub use client_state::*;
pub use connection::Database;
