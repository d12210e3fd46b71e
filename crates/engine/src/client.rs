//! Chat client: session state, the connection manager and the display sink
//!
//! All methods are synchronous and are meant to be called from one event
//! loop (see [`crate::runtime`]). Delayed reconnects are stored as a
//! deadline that the loop waits on.

use petshop_core::{ClientConfig, DisplayLine, Result, Session};
use petshop_networking::websocket::{
    send_message, ConnectionId, ConnectionManager, ConnectionStatus, DisplaySink, EventReceiver,
    SendOutcome, TaggedEvent, Transport,
};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

pub const LOGGED_OUT_NOTICE: &str = "You have logged out";

pub struct ChatClient<T: Transport, S: DisplaySink> {
    session: Session,
    connection: ConnectionManager<T>,
    sink: S,
    startup_connect_delay: Duration,
    login_reconnect_delay: Duration,
    /// Pending reconnect; a newer request replaces an older one
    reconnect_at: Option<Instant>,
}

impl<T: Transport, S: DisplaySink> ChatClient<T, S> {
    pub fn new(transport: T, sink: S, config: &ClientConfig) -> (Self, EventReceiver) {
        let (connection, events) = ConnectionManager::new(transport, config.chat_endpoint.clone());
        let client = Self {
            session: Session::new(),
            connection,
            sink,
            startup_connect_delay: config.startup_connect_delay,
            login_reconnect_delay: config.login_reconnect_delay,
            reconnect_at: None,
        };
        (client, events)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> ConnectionStatus {
        self.connection.status()
    }

    pub fn connection(&self) -> &ConnectionManager<T> {
        &self.connection
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Manual (re)connect; supersedes any open or pending attempt
    pub fn connect(&mut self) -> ConnectionId {
        self.connection.connect()
    }

    pub fn disconnect(&mut self) {
        self.connection.disconnect();
    }

    /// Adopt an identity restored from persisted state, without reconnecting
    pub fn restore(&mut self, identity: &str) {
        debug!("Restored session for {}", identity);
        self.session.set_identity(identity);
    }

    /// Record a successful login and schedule a reconnect so the new
    /// connection is made under the new identity
    pub fn login(&mut self, identity: &str) {
        info!("Logged in as {}", identity);
        self.session.set_identity(identity);
        self.schedule_reconnect(self.login_reconnect_delay);
    }

    /// Clear the identity and close the chat
    pub fn logout(&mut self) {
        if let Some(previous) = self.session.clear() {
            info!("Logged out {}", previous);
        }
        self.connection.disconnect();
        self.sink.display(DisplayLine::info(LOGGED_OUT_NOTICE));
    }

    /// Schedule the first connection after startup
    pub fn schedule_startup_connect(&mut self) {
        self.schedule_reconnect(self.startup_connect_delay);
    }

    pub fn schedule_reconnect(&mut self, delay: Duration) {
        debug!("Chat reconnect scheduled in {:?}", delay);
        self.reconnect_at = Some(Instant::now() + delay);
    }

    pub fn reconnect_deadline(&self) -> Option<Instant> {
        self.reconnect_at
    }

    /// Connect if the scheduled reconnect is due at `now`
    pub fn fire_due_reconnect(&mut self, now: Instant) -> bool {
        match self.reconnect_at {
            Some(deadline) if deadline <= now => {
                self.reconnect_at = None;
                self.connection.connect();
                true
            }
            _ => false,
        }
    }

    /// Run `raw_text` through the send gate
    pub fn send(&mut self, raw_text: &str) -> Result<SendOutcome> {
        send_message(raw_text, &self.session, &self.connection, &mut self.sink)
    }

    /// Send the contents of an input buffer, clearing it once sent
    ///
    /// The buffer is left untouched on rejection so the user can resubmit.
    pub fn submit(&mut self, input: &mut String) -> Result<SendOutcome> {
        let outcome = self.send(input)?;
        if matches!(outcome, SendOutcome::Sent(_)) {
            input.clear();
        }
        Ok(outcome)
    }

    pub fn handle_event(&mut self, event: TaggedEvent) {
        self.connection.handle_event(event, &mut self.sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petshop_core::{Error, FrameKind};
    use petshop_networking::websocket::{MemoryTransport, SocketEvent, NORMAL_CLOSURE};

    fn client() -> (ChatClient<MemoryTransport, Vec<DisplayLine>>, MemoryTransport) {
        let transport = MemoryTransport::new();
        let (client, _events) = ChatClient::new(transport.clone(), Vec::new(), &ClientConfig::default());
        (client, transport)
    }

    fn open(client: &mut ChatClient<MemoryTransport, Vec<DisplayLine>>) -> ConnectionId {
        let id = client.connect();
        client.handle_event(TaggedEvent {
            connection: id,
            event: SocketEvent::Opened,
        });
        id
    }

    #[test]
    fn test_login_sets_identity_and_schedules_reconnect() {
        let (mut client, transport) = client();
        let before = Instant::now();

        client.login("alice");

        assert_eq!(client.session().identity(), Some("alice"));
        assert!(transport.opened().is_empty());

        let deadline = client.reconnect_deadline().expect("reconnect scheduled");
        assert!(deadline >= before + Duration::from_millis(500));

        assert!(!client.fire_due_reconnect(before));
        assert!(transport.opened().is_empty());

        assert!(client.fire_due_reconnect(deadline));
        assert_eq!(transport.opened().len(), 1);
        assert_eq!(client.status(), ConnectionStatus::Connecting);
        assert!(client.reconnect_deadline().is_none());
    }

    #[test]
    fn test_restore_does_not_schedule() {
        let (mut client, _transport) = client();
        client.restore("alice");
        assert_eq!(client.session().identity(), Some("alice"));
        assert!(client.reconnect_deadline().is_none());
    }

    #[test]
    fn test_startup_connect_uses_startup_delay() {
        let (mut client, _transport) = client();
        let before = Instant::now();
        client.schedule_startup_connect();
        let deadline = client.reconnect_deadline().unwrap();
        assert!(deadline >= before + Duration::from_millis(1000));
    }

    #[test]
    fn test_logout_clears_identity_and_closes() {
        let (mut client, transport) = client();
        client.restore("alice");
        let id = open(&mut client);

        client.logout();

        assert!(client.session().identity().is_none());
        assert_eq!(client.status(), ConnectionStatus::Closing);
        assert_eq!(transport.closes(), vec![(id, NORMAL_CLOSURE)]);
        let last = client.sink().last().unwrap();
        assert_eq!(last, &DisplayLine::info(LOGGED_OUT_NOTICE));

        client.handle_event(TaggedEvent {
            connection: id,
            event: SocketEvent::Closed { code: NORMAL_CLOSURE },
        });
        assert_eq!(client.status(), ConnectionStatus::Disconnected);
        assert!(!client.sink().iter().any(|l| l.kind == FrameKind::Error));
    }

    #[test]
    fn test_submit_clears_input_only_when_sent() {
        let (mut client, transport) = client();
        client.restore("alice");
        open(&mut client);

        let mut input = String::from("hi");
        client.submit(&mut input).unwrap();
        assert!(input.is_empty());
        assert_eq!(transport.sent(), vec![r#"{"username":"alice","message":"hi"}"#.to_string()]);

        client.logout();
        let mut input = String::from("still here");
        assert!(matches!(client.submit(&mut input), Err(Error::NotConnected)));
        assert_eq!(input, "still here");
    }

    #[test]
    fn test_send_without_identity_is_rejected() {
        let (mut client, transport) = client();
        open(&mut client);
        let notices_before = client.sink().len();

        assert!(matches!(client.send("hello"), Err(Error::NotAuthenticated)));
        assert!(transport.sent().is_empty());
        assert_eq!(client.sink().len(), notices_before);
    }
}
