//! PetShop Networking - HTTP client, chat WebSocket, and API wrappers

pub mod api;
pub mod http;
pub mod websocket;

pub use http::PetShopClient;
pub use websocket::{ConnectionManager, ConnectionStatus, DisplaySink, WsTransport};
