//! Chat wire frames and display lines

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username shown on notices produced by the client itself
pub const SYSTEM_USERNAME: &str = "System";

/// Kind of a chat frame (the `type` field on the wire)
///
/// Anything other than `message` and `ping` is rendered as a notice.
/// Unknown kinds are kept verbatim so the display can still show them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FrameKind {
    Message,
    /// Server keepalive, never displayed
    Ping,
    Success,
    Error,
    Info,
    Other(String),
}

impl FrameKind {
    pub fn as_str(&self) -> &str {
        match self {
            FrameKind::Message => "message",
            FrameKind::Ping => "ping",
            FrameKind::Success => "success",
            FrameKind::Error => "error",
            FrameKind::Info => "info",
            FrameKind::Other(kind) => kind,
        }
    }

    /// True for system-originated lines (anything but a chat message)
    pub fn is_notice(&self) -> bool {
        !matches!(self, FrameKind::Message | FrameKind::Ping)
    }
}

impl From<String> for FrameKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "message" => FrameKind::Message,
            "ping" => FrameKind::Ping,
            "success" => FrameKind::Success,
            "error" => FrameKind::Error,
            "info" => FrameKind::Info,
            _ => FrameKind::Other(kind),
        }
    }
}

impl From<FrameKind> for String {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame received from the chat socket
///
/// Wire format: `{ "type": "...", "username": "...", "message": "..." }`,
/// every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFrame {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FrameKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "message", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ChatFrame {
    /// Parse a raw text frame
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Frame kind, `Message` when the sender left it out
    pub fn kind(&self) -> FrameKind {
        self.kind.clone().unwrap_or(FrameKind::Message)
    }

    pub fn is_ping(&self) -> bool {
        matches!(self.kind, Some(FrameKind::Ping))
    }
}

/// Chat message sent by the logged-in user
///
/// Wire format: `{ "username": "...", "message": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundChatMessage {
    pub username: String,
    #[serde(rename = "message")]
    pub text: String,
}

impl OutboundChatMessage {
    /// Build a message, rejecting an empty username or text
    pub fn new(username: &str, text: &str) -> Result<Self> {
        if username.is_empty() {
            return Err(Error::InvalidData("username must not be empty".to_string()));
        }
        if text.trim().is_empty() {
            return Err(Error::InvalidData("message must not be empty".to_string()));
        }
        Ok(Self {
            username: username.to_string(),
            text: text.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One line handed to the display sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub username: Option<String>,
    pub text: Option<String>,
    pub kind: FrameKind,
}

impl DisplayLine {
    /// Client-side notice attributed to the system user
    pub fn notice(kind: FrameKind, text: impl Into<String>) -> Self {
        Self {
            username: Some(SYSTEM_USERNAME.to_string()),
            text: Some(text.into()),
            kind,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::notice(FrameKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::notice(FrameKind::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::notice(FrameKind::Info, text)
    }

    pub fn is_notice(&self) -> bool {
        self.kind.is_notice()
    }
}

impl From<ChatFrame> for DisplayLine {
    fn from(frame: ChatFrame) -> Self {
        let kind = frame.kind();
        Self {
            username: frame.username,
            text: frame.text,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_frame() {
        let frame = ChatFrame::parse(r#"{"type":"message","username":"bob","message":"yo"}"#).unwrap();
        assert_eq!(frame.kind(), FrameKind::Message);
        assert_eq!(frame.username.as_deref(), Some("bob"));
        assert_eq!(frame.text.as_deref(), Some("yo"));
    }

    #[test]
    fn test_missing_type_defaults_to_message() {
        let frame = ChatFrame::parse(r#"{"username":"bob","message":"yo"}"#).unwrap();
        assert!(frame.kind.is_none());
        assert_eq!(frame.kind(), FrameKind::Message);
        assert!(!frame.is_ping());
    }

    #[test]
    fn test_ping_and_unknown_kinds() {
        assert!(ChatFrame::parse(r#"{"type":"ping"}"#).unwrap().is_ping());

        let frame = ChatFrame::parse(r#"{"type":"announcement","message":"sale"}"#).unwrap();
        assert_eq!(frame.kind(), FrameKind::Other("announcement".to_string()));
        assert!(frame.kind().is_notice());
    }

    #[test]
    fn test_malformed_frames_rejected() {
        assert!(ChatFrame::parse("not json").is_err());
        assert!(ChatFrame::parse("[1,2,3]").is_err());
        assert!(ChatFrame::parse(r#"{"username":42}"#).is_err());
    }

    #[test]
    fn test_outbound_wire_format() {
        let msg = OutboundChatMessage::new("alice", "hi").unwrap();
        assert_eq!(msg.to_json().unwrap(), r#"{"username":"alice","message":"hi"}"#);
    }

    #[test]
    fn test_outbound_requires_username_and_text() {
        assert!(OutboundChatMessage::new("", "hi").is_err());
        assert!(OutboundChatMessage::new("alice", "   ").is_err());
    }

    #[test]
    fn test_display_line_from_frame() {
        let frame = ChatFrame::parse(r#"{"type":"info","message":"someone left"}"#).unwrap();
        let line = DisplayLine::from(frame);
        assert_eq!(line.kind, FrameKind::Info);
        assert!(line.username.is_none());
        assert!(line.is_notice());
    }
}
