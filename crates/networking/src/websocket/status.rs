//! Connection status and the lifecycle transition table

use super::transport::SocketEvent;
use petshop_core::DisplayLine;

/// Close code for a normal, intentional closure
pub const NORMAL_CLOSURE: u16 = 1000;
/// Close frame arrived without a status code
pub const NO_STATUS_RECEIVED: u16 = 1005;
/// Stream ended or failed without a close frame
pub const ABNORMAL_CLOSURE: u16 = 1006;

pub const CONNECTED_NOTICE: &str = "Connected to chat";
pub const CONNECTION_LOST_NOTICE: &str = "Connection to chat lost";

/// Lifecycle state of the chat connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Open,
    Closing,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Open => "open",
            ConnectionStatus::Closing => "closing",
        }
    }
}

/// Result of applying one socket event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub status: ConnectionStatus,
    pub notice: Option<DisplayLine>,
}

impl Transition {
    fn to(status: ConnectionStatus) -> Self {
        Self { status, notice: None }
    }

    fn with_notice(mut self, notice: DisplayLine) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// Status x event table for the current connection
///
/// | status      | event          | next         | notice         |
/// |-------------|----------------|--------------|----------------|
/// | Connecting  | Opened         | Open         | success        |
/// | other       | Opened         | unchanged    | -              |
/// | any         | Closed(1000)   | Disconnected | -              |
/// | any         | Closed(other)  | Disconnected | error          |
/// | any         | Failed         | Disconnected | -              |
/// | any         | Frame          | unchanged    | -              |
///
/// A handshake that completes after `disconnect()` leaves the status at
/// `Closing`; the close event that follows settles it.
pub fn transition(status: ConnectionStatus, event: &SocketEvent) -> Transition {
    match (status, event) {
        (ConnectionStatus::Connecting, SocketEvent::Opened) => {
            Transition::to(ConnectionStatus::Open).with_notice(DisplayLine::success(CONNECTED_NOTICE))
        }
        (current, SocketEvent::Opened) => Transition::to(current),
        (_, SocketEvent::Closed { code }) if *code == NORMAL_CLOSURE => {
            Transition::to(ConnectionStatus::Disconnected)
        }
        (_, SocketEvent::Closed { .. }) => Transition::to(ConnectionStatus::Disconnected)
            .with_notice(DisplayLine::error(CONNECTION_LOST_NOTICE)),
        (_, SocketEvent::Failed(_)) => Transition::to(ConnectionStatus::Disconnected),
        (current, SocketEvent::Frame(_)) => Transition::to(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petshop_core::FrameKind;

    #[test]
    fn test_handshake_opens_with_success_notice() {
        let t = transition(ConnectionStatus::Connecting, &SocketEvent::Opened);
        assert_eq!(t.status, ConnectionStatus::Open);
        assert_eq!(t.notice.map(|n| n.kind), Some(FrameKind::Success));
    }

    #[test]
    fn test_late_handshake_while_closing() {
        let t = transition(ConnectionStatus::Closing, &SocketEvent::Opened);
        assert_eq!(t, Transition::to(ConnectionStatus::Closing));
    }

    #[test]
    fn test_close_code_semantics() {
        for status in [
            ConnectionStatus::Connecting,
            ConnectionStatus::Open,
            ConnectionStatus::Closing,
        ] {
            let normal = transition(status, &SocketEvent::Closed { code: NORMAL_CLOSURE });
            assert_eq!(normal.status, ConnectionStatus::Disconnected);
            assert!(normal.notice.is_none());

            for code in [1001, NO_STATUS_RECEIVED, ABNORMAL_CLOSURE, 4000] {
                let abnormal = transition(status, &SocketEvent::Closed { code });
                assert_eq!(abnormal.status, ConnectionStatus::Disconnected);
                assert_eq!(abnormal.notice.map(|n| n.kind), Some(FrameKind::Error));
            }
        }
    }

    #[test]
    fn test_failure_disconnects_silently() {
        let t = transition(ConnectionStatus::Connecting, &SocketEvent::Failed("refused".into()));
        assert_eq!(t, Transition::to(ConnectionStatus::Disconnected));
    }

    #[test]
    fn test_frames_do_not_change_status() {
        let t = transition(ConnectionStatus::Open, &SocketEvent::Frame("{}".into()));
        assert_eq!(t, Transition::to(ConnectionStatus::Open));
    }
}
