//! PetShop Engine - Chat client state and its event loop

pub mod client;
pub mod runtime;

pub use client::ChatClient;
pub use runtime::{spawn_chat_client, ChatClientHandle, ClientCommand, ClientStatus};
