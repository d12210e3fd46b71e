//! Data models for PetShop entities

mod auth;
mod chat;
mod product;
mod session;

pub use auth::*;
pub use chat::*;
pub use product::*;
pub use session::*;
