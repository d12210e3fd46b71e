//! Chat WebSocket: connection lifecycle, inbound dispatch and the send gate
//!
//! Everything here is driven from a single event loop. The
//! [`ConnectionManager`] owns the only socket handle; socket tasks report
//! back through an event channel and never touch manager state directly.

mod dispatcher;
mod gate;
mod manager;
pub mod memory;
mod sink;
mod status;
mod transport;

pub use dispatcher::{dispatch_frame, Dispatch};
pub use gate::{send_message, SendOutcome, NOT_CONNECTED_NOTICE, SEND_FAILED_NOTICE};
pub use manager::ConnectionManager;
pub use memory::MemoryTransport;
pub use sink::DisplaySink;
pub use status::{
    transition, ConnectionStatus, Transition, ABNORMAL_CLOSURE, CONNECTED_NOTICE,
    CONNECTION_LOST_NOTICE, NORMAL_CLOSURE, NO_STATUS_RECEIVED,
};
pub use transport::{
    ConnectionId, EventReceiver, EventSender, SocketEvent, SocketHandle, TaggedEvent, Transport,
    WsTransport,
};
