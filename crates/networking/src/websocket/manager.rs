//! Connection manager: owns the single chat socket

use super::dispatcher::dispatch_frame;
use super::sink::DisplaySink;
use super::status::{transition, ConnectionStatus, NORMAL_CLOSURE};
use super::transport::{
    ConnectionId, EventReceiver, EventSender, SocketEvent, SocketHandle, TaggedEvent, Transport,
};
use petshop_core::{Error, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The attempt currently occupying the slot
struct ActiveConnection {
    id: ConnectionId,
    /// Dropped once the attempt reaches `Disconnected`
    handle: Option<Box<dyn SocketHandle>>,
}

/// Owns the one chat connection of the process
///
/// `connect()` always closes whatever occupies the slot before opening a
/// new attempt, and events from older attempts are ignored, so at most one
/// socket is ever live. Socket events come back through the receiver
/// returned by [`ConnectionManager::new`] and must be fed to
/// [`ConnectionManager::handle_event`] on the same event loop.
pub struct ConnectionManager<T: Transport> {
    transport: T,
    endpoint: String,
    status: ConnectionStatus,
    active: Option<ActiveConnection>,
    next_id: ConnectionId,
    events: EventSender,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(transport: T, endpoint: impl Into<String>) -> (Self, EventReceiver) {
        let (events, receiver) = mpsc::unbounded_channel();
        let manager = Self {
            transport,
            endpoint: endpoint.into(),
            status: ConnectionStatus::Disconnected,
            active: None,
            next_id: 1,
            events,
        };
        (manager, receiver)
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == ConnectionStatus::Open
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Id of the attempt whose events are currently honored
    pub fn active_connection(&self) -> Option<ConnectionId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Whether a socket handle is currently held
    pub fn has_handle(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.handle.is_some())
    }

    /// Start a new attempt, superseding any previous one
    ///
    /// Returns as soon as the transport has been asked to open; the
    /// handshake result arrives later as an event.
    pub fn connect(&mut self) -> ConnectionId {
        self.release_current();

        let id = self.next_id;
        self.next_id += 1;
        self.status = ConnectionStatus::Connecting;

        match self.transport.open(&self.endpoint, id, self.events.clone()) {
            Ok(handle) => {
                debug!("Chat attempt {} opening {}", id, self.endpoint);
                self.active = Some(ActiveConnection {
                    id,
                    handle: Some(handle),
                });
            }
            Err(e) => {
                error!("Failed to create chat socket: {}", e);
                self.active = Some(ActiveConnection { id, handle: None });
                self.status = ConnectionStatus::Disconnected;
            }
        }

        id
    }

    /// Ask the current socket to close normally
    ///
    /// Status moves to `Closing` and settles on `Disconnected` when the close
    /// event arrives. If the close request cannot even be queued the socket
    /// is already gone, so the status drops straight to `Disconnected`.
    pub fn disconnect(&mut self) {
        if self.status == ConnectionStatus::Disconnected {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(handle) = active.handle.as_ref() else {
            self.status = ConnectionStatus::Disconnected;
            return;
        };

        match handle.close(NORMAL_CLOSURE) {
            Ok(()) => {
                info!("Closing chat connection {}", active.id);
                self.status = ConnectionStatus::Closing;
            }
            Err(e) => {
                warn!("Chat close request failed, treating as closed: {}", e);
                active.handle = None;
                self.status = ConnectionStatus::Disconnected;
            }
        }
    }

    /// Transmit one text frame on the current socket
    pub fn send_text(&self, text: String) -> Result<()> {
        if !self.is_open() {
            return Err(Error::NotConnected);
        }
        let handle = self
            .active
            .as_ref()
            .and_then(|a| a.handle.as_ref())
            .ok_or(Error::NotConnected)?;
        handle.send_text(text)
    }

    /// Apply one socket event
    ///
    /// Frames go to the dispatcher; lifecycle events go through the
    /// transition table and may produce a notice.
    pub fn handle_event(&mut self, tagged: TaggedEvent, sink: &mut dyn DisplaySink) {
        let TaggedEvent { connection, event } = tagged;

        if self.active_connection() != Some(connection) {
            debug!("Ignoring {:?} from superseded attempt {}", event, connection);
            return;
        }

        if let SocketEvent::Frame(raw) = &event {
            dispatch_frame(raw, sink);
            return;
        }

        let previous = self.status;
        let step = transition(previous, &event);
        self.status = step.status;

        if step.status == ConnectionStatus::Disconnected {
            if let Some(active) = self.active.as_mut() {
                active.handle = None;
            }
        }

        match &event {
            SocketEvent::Failed(reason) => warn!("Chat transport error: {}", reason),
            SocketEvent::Closed { code } => debug!("Chat closed with code {}", code),
            _ => {}
        }
        if previous != step.status {
            debug!("Chat status {} -> {}", previous.as_str(), step.status.as_str());
        }

        if let Some(notice) = step.notice {
            sink.display(notice);
        }
    }

    /// Close and forget the current attempt; close errors are only logged
    fn release_current(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if let Some(handle) = active.handle {
            if let Err(e) = handle.close(NORMAL_CLOSURE) {
                debug!("Ignoring close error on attempt {}: {}", active.id, e);
            }
        }
    }
}
