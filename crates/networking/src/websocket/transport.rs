//! Socket transport seam and the tokio-tungstenite implementation

use super::status::{ABNORMAL_CLOSURE, NO_STATUS_RECEIVED};
use futures_util::{SinkExt, StreamExt};
use petshop_core::{Error, Result};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Identifies one connection attempt; a new `connect()` gets a new id
pub type ConnectionId = u64;

/// What a socket reports back to the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Handshake completed
    Opened,
    /// Text frame received
    Frame(String),
    /// Channel closed, locally or remotely
    Closed { code: u16 },
    /// Transport-level error
    Failed(String),
}

/// Socket event tagged with the attempt that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEvent {
    pub connection: ConnectionId,
    pub event: SocketEvent,
}

pub type EventSender = mpsc::UnboundedSender<TaggedEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<TaggedEvent>;

/// Control side of one open (or opening) socket
///
/// Both calls only enqueue work; neither waits on the network.
pub trait SocketHandle: Send {
    fn send_text(&self, text: String) -> Result<()>;
    fn close(&self, code: u16) -> Result<()>;
}

/// Opens sockets. `open` must return without waiting for the handshake and
/// report progress through `events`.
pub trait Transport: Send {
    fn open(
        &mut self,
        endpoint: &str,
        connection: ConnectionId,
        events: EventSender,
    ) -> Result<Box<dyn SocketHandle>>;
}

/// Requests from the handle to the socket task
#[derive(Debug)]
enum Outgoing {
    Text(String),
    Close(u16),
}

/// WebSocket transport backed by tokio-tungstenite
///
/// Each socket runs in its own task. Must be used inside a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for WsTransport {
    fn open(
        &mut self,
        endpoint: &str,
        connection: ConnectionId,
        events: EventSender,
    ) -> Result<Box<dyn SocketHandle>> {
        let request = endpoint
            .into_client_request()
            .map_err(|e| Error::InvalidData(format!("invalid chat endpoint {}: {}", endpoint, e)))?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_socket(request, connection, events, rx));

        Ok(Box::new(WsHandle { tx }))
    }
}

struct WsHandle {
    tx: mpsc::UnboundedSender<Outgoing>,
}

impl SocketHandle for WsHandle {
    fn send_text(&self, text: String) -> Result<()> {
        self.tx
            .send(Outgoing::Text(text))
            .map_err(|_| Error::TransmissionFailed("socket task has exited".to_string()))
    }

    fn close(&self, code: u16) -> Result<()> {
        self.tx
            .send(Outgoing::Close(code))
            .map_err(|_| Error::NetworkError("socket task has exited".to_string()))
    }
}

/// Socket task: handshake, then pump frames both ways until closed
///
/// Emits exactly one `Closed` per attempt, except when the handle is dropped
/// (the attempt was superseded and nobody is listening for it).
async fn run_socket(
    request: Request,
    connection: ConnectionId,
    events: EventSender,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
) {
    let emit = |event: SocketEvent| {
        let _ = events.send(TaggedEvent { connection, event });
    };

    let uri = request.uri().to_string();
    info!("Connecting to chat at {} (attempt {})", uri, connection);

    let handshake = connect_async(request);
    tokio::pin!(handshake);

    let stream = loop {
        tokio::select! {
            result = &mut handshake => match result {
                Ok((stream, _response)) => break stream,
                Err(e) => {
                    warn!("Chat handshake failed: {}", e);
                    emit(SocketEvent::Failed(e.to_string()));
                    emit(SocketEvent::Closed { code: ABNORMAL_CLOSURE });
                    return;
                }
            },
            request = outgoing.recv() => match request {
                Some(Outgoing::Close(code)) => {
                    debug!("Close requested before handshake completed");
                    emit(SocketEvent::Closed { code });
                    return;
                }
                Some(Outgoing::Text(_)) => {
                    warn!("Dropping frame queued before handshake completed");
                }
                None => {
                    debug!("Attempt {} abandoned during handshake", connection);
                    return;
                }
            },
        }
    };

    info!("Chat connection {} established", connection);
    emit(SocketEvent::Opened);

    let (mut writer, mut reader) = stream.split();
    let mut requested_close: Option<u16> = None;

    loop {
        tokio::select! {
            request = outgoing.recv() => match request {
                Some(Outgoing::Text(text)) => {
                    if let Err(e) = writer.send(Message::Text(text.into())).await {
                        warn!("Chat send failed: {}", e);
                        emit(SocketEvent::Failed(e.to_string()));
                        emit(SocketEvent::Closed { code: requested_close.unwrap_or(ABNORMAL_CLOSURE) });
                        return;
                    }
                }
                Some(Outgoing::Close(code)) => {
                    if requested_close.is_none() {
                        requested_close = Some(code);
                        let frame = CloseFrame {
                            code: CloseCode::from(code),
                            reason: String::new().into(),
                        };
                        if let Err(e) = writer.send(Message::Close(Some(frame))).await {
                            debug!("Close frame not sent: {}", e);
                            emit(SocketEvent::Closed { code });
                            return;
                        }
                    }
                }
                None => {
                    debug!("Attempt {} abandoned, dropping socket", connection);
                    let _ = writer.close().await;
                    return;
                }
            },
            message = reader.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    emit(SocketEvent::Frame(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(frame))) => {
                    let received = frame.map(|f| u16::from(f.code)).unwrap_or(NO_STATUS_RECEIVED);
                    let code = requested_close.unwrap_or(received);
                    info!("Chat connection {} closed with code {}", connection, code);
                    emit(SocketEvent::Closed { code });
                    return;
                }
                // Control frames are answered by tungstenite; binary is not part of the protocol
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    match requested_close {
                        Some(code) => emit(SocketEvent::Closed { code }),
                        None => {
                            warn!("Chat connection {} error: {}", connection, e);
                            emit(SocketEvent::Failed(e.to_string()));
                            emit(SocketEvent::Closed { code: ABNORMAL_CLOSURE });
                        }
                    }
                    return;
                }
                None => {
                    emit(SocketEvent::Closed { code: requested_close.unwrap_or(ABNORMAL_CLOSURE) });
                    return;
                }
            },
        }
    }
}
