//! Outbound gate: the only way chat text reaches the socket

use super::manager::ConnectionManager;
use super::sink::DisplaySink;
use super::transport::Transport;
use petshop_core::{DisplayLine, Error, OutboundChatMessage, Result, Session};
use tracing::{debug, warn};

pub const NOT_CONNECTED_NOTICE: &str = "Chat is not connected. Reconnect and try again";
pub const SEND_FAILED_NOTICE: &str = "Failed to send message";

/// Successful gate outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, nothing done
    Empty,
    /// Message handed to the socket; the caller clears its input
    Sent(OutboundChatMessage),
}

/// Validate and transmit one chat message
///
/// Checks run in order: blank text, connection open, identity present.
/// Rejections are never queued.
///
/// * not open: one error notice, `Err(NotConnected)`
/// * no identity: no notice, `Err(NotAuthenticated)` for the caller to prompt
/// * transport refuses: one error notice, `Err(TransmissionFailed)`
pub fn send_message<T: Transport>(
    raw_text: &str,
    session: &Session,
    connection: &ConnectionManager<T>,
    sink: &mut dyn DisplaySink,
) -> Result<SendOutcome> {
    let text = raw_text.trim();
    if text.is_empty() {
        return Ok(SendOutcome::Empty);
    }

    if !connection.is_open() {
        debug!("Send rejected, chat is {}", connection.status().as_str());
        sink.display(DisplayLine::error(NOT_CONNECTED_NOTICE));
        return Err(Error::NotConnected);
    }

    let Some(identity) = session.identity() else {
        debug!("Send rejected, no identity");
        return Err(Error::NotAuthenticated);
    };

    let message = OutboundChatMessage::new(identity, text)?;
    let payload = message.to_json()?;

    match connection.send_text(payload) {
        Ok(()) => Ok(SendOutcome::Sent(message)),
        Err(e) => {
            warn!("Chat message dropped: {}", e);
            sink.display(DisplayLine::error(SEND_FAILED_NOTICE));
            Err(match e {
                Error::TransmissionFailed(reason) => Error::TransmissionFailed(reason),
                other => Error::TransmissionFailed(other.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::memory::MemoryTransport;
    use crate::websocket::transport::{SocketEvent, TaggedEvent};
    use petshop_core::FrameKind;

    fn open_manager() -> (ConnectionManager<MemoryTransport>, MemoryTransport) {
        let transport = MemoryTransport::new();
        let (mut manager, _events) = ConnectionManager::new(transport.clone(), "ws://test/chat");
        let id = manager.connect();
        let mut ignored: Vec<DisplayLine> = Vec::new();
        manager.handle_event(
            TaggedEvent {
                connection: id,
                event: SocketEvent::Opened,
            },
            &mut ignored,
        );
        (manager, transport)
    }

    fn session(identity: Option<&str>) -> Session {
        let mut session = Session::new();
        if let Some(identity) = identity {
            session.set_identity(identity);
        }
        session
    }

    #[test]
    fn test_send_as_logged_in_user() {
        let (manager, transport) = open_manager();
        let mut sink: Vec<DisplayLine> = Vec::new();

        let outcome = send_message("  hi ", &session(Some("alice")), &manager, &mut sink).unwrap();

        assert!(matches!(outcome, SendOutcome::Sent(ref m) if m.text == "hi"));
        assert_eq!(transport.sent(), vec![r#"{"username":"alice","message":"hi"}"#.to_string()]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_rejected_when_not_connected() {
        let transport = MemoryTransport::new();
        let (manager, _events) = ConnectionManager::new(transport.clone(), "ws://test/chat");
        let mut sink: Vec<DisplayLine> = Vec::new();

        let err = send_message("hello", &session(Some("alice")), &manager, &mut sink).unwrap_err();

        assert!(matches!(err, Error::NotConnected));
        assert!(transport.sent().is_empty());
        assert_eq!(sink, vec![DisplayLine::error(NOT_CONNECTED_NOTICE)]);
    }

    #[test]
    fn test_rejected_while_connecting() {
        let transport = MemoryTransport::new();
        let (mut manager, _events) = ConnectionManager::new(transport.clone(), "ws://test/chat");
        manager.connect();
        let mut sink: Vec<DisplayLine> = Vec::new();

        assert!(send_message("hello", &session(Some("alice")), &manager, &mut sink).is_err());
        assert!(transport.sent().is_empty());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_rejected_without_identity() {
        let (manager, transport) = open_manager();
        let mut sink: Vec<DisplayLine> = Vec::new();

        let err = send_message("hello", &session(None), &manager, &mut sink).unwrap_err();

        assert!(matches!(err, Error::NotAuthenticated));
        assert!(transport.sent().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_whitespace_is_noop() {
        let (manager, transport) = open_manager();
        let mut sink: Vec<DisplayLine> = Vec::new();

        let outcome = send_message("   ", &session(Some("alice")), &manager, &mut sink).unwrap();
        assert_eq!(outcome, SendOutcome::Empty);

        // Also a no-op when nothing else would pass
        let transport_idle = MemoryTransport::new();
        let (idle, _events) = ConnectionManager::new(transport_idle, "ws://test/chat");
        let outcome = send_message("\t\n", &session(None), &idle, &mut sink).unwrap();
        assert_eq!(outcome, SendOutcome::Empty);

        assert!(transport.sent().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_transmission_failure_drops_message() {
        let (manager, transport) = open_manager();
        transport.set_fail_send(true);
        let mut sink: Vec<DisplayLine> = Vec::new();

        let err = send_message("hello", &session(Some("alice")), &manager, &mut sink).unwrap_err();

        assert!(matches!(err, Error::TransmissionFailed(_)));
        assert!(transport.sent().is_empty());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, FrameKind::Error);

        // Nothing was queued for later
        transport.set_fail_send(false);
        assert!(transport.sent().is_empty());
    }
}
