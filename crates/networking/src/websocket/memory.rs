//! In-process transport
//!
//! Records what the manager asks of it and lets the caller inject socket
//! events by hand. Used by the test suites of this and downstream crates.

use super::transport::{ConnectionId, EventSender, SocketEvent, SocketHandle, TaggedEvent, Transport};
use petshop_core::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MemoryState {
    opened: Vec<(ConnectionId, String)>,
    sent: Vec<(ConnectionId, String)>,
    closes: Vec<(ConnectionId, u16)>,
    fail_open: bool,
    fail_send: bool,
    events: Option<EventSender>,
}

/// Cloneable transport whose clones share one log
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ids of every attempt opened so far, oldest first
    pub fn opened(&self) -> Vec<ConnectionId> {
        self.lock().opened.iter().map(|(id, _)| *id).collect()
    }

    /// Endpoint passed to the most recent `open`
    pub fn last_endpoint(&self) -> Option<String> {
        self.lock().opened.last().map(|(_, endpoint)| endpoint.clone())
    }

    /// Every text frame transmitted, across all attempts
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.iter().map(|(_, text)| text.clone()).collect()
    }

    /// Close requests as `(attempt, code)`
    pub fn closes(&self) -> Vec<(ConnectionId, u16)> {
        self.lock().closes.clone()
    }

    /// Make subsequent `open` calls fail synchronously
    pub fn set_fail_open(&self, fail: bool) {
        self.lock().fail_open = fail;
    }

    /// Make subsequent `send_text` calls fail
    pub fn set_fail_send(&self, fail: bool) {
        self.lock().fail_send = fail;
    }

    /// Push an event into the manager's channel as if `connection` produced it
    pub fn emit(&self, connection: ConnectionId, event: SocketEvent) -> bool {
        match self.lock().events.as_ref() {
            Some(events) => events.send(TaggedEvent { connection, event }).is_ok(),
            None => false,
        }
    }
}

impl Transport for MemoryTransport {
    fn open(
        &mut self,
        endpoint: &str,
        connection: ConnectionId,
        events: EventSender,
    ) -> Result<Box<dyn SocketHandle>> {
        let mut state = self.lock();
        if state.fail_open {
            return Err(Error::NetworkError("open refused".to_string()));
        }
        state.opened.push((connection, endpoint.to_string()));
        state.events = Some(events);

        Ok(Box::new(MemoryHandle {
            connection,
            transport: self.clone(),
        }))
    }
}

struct MemoryHandle {
    connection: ConnectionId,
    transport: MemoryTransport,
}

impl SocketHandle for MemoryHandle {
    fn send_text(&self, text: String) -> Result<()> {
        let mut state = self.transport.lock();
        if state.fail_send {
            return Err(Error::TransmissionFailed("send refused".to_string()));
        }
        state.sent.push((self.connection, text));
        Ok(())
    }

    fn close(&self, code: u16) -> Result<()> {
        self.transport.lock().closes.push((self.connection, code));
        Ok(())
    }
}
