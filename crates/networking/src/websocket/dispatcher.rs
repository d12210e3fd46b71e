//! Inbound frame dispatch

use super::sink::DisplaySink;
use petshop_core::{ChatFrame, DisplayLine};
use tracing::{debug, warn};

/// What happened to an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Displayed,
    /// Keepalive, dropped
    Filtered,
    /// Unparseable, dropped and logged
    Malformed,
}

/// Parse one raw frame and hand it to the sink
///
/// Frames are forwarded immediately, so the sink sees them in the order the
/// transport delivered them.
pub fn dispatch_frame(raw: &str, sink: &mut dyn DisplaySink) -> Dispatch {
    let frame = match ChatFrame::parse(raw) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Dropping malformed chat frame: {} ({} bytes)", e, raw.len());
            return Dispatch::Malformed;
        }
    };

    if frame.is_ping() {
        debug!("Keepalive received");
        return Dispatch::Filtered;
    }

    sink.display(DisplayLine::from(frame));
    Dispatch::Displayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use petshop_core::FrameKind;

    #[test]
    fn test_message_reaches_sink() {
        let mut sink: Vec<DisplayLine> = Vec::new();
        let outcome = dispatch_frame(r#"{"type":"message","username":"bob","message":"yo"}"#, &mut sink);

        assert_eq!(outcome, Dispatch::Displayed);
        assert_eq!(
            sink,
            vec![DisplayLine {
                username: Some("bob".to_string()),
                text: Some("yo".to_string()),
                kind: FrameKind::Message,
            }]
        );
    }

    #[test]
    fn test_pings_never_reach_sink() {
        let mut sink: Vec<DisplayLine> = Vec::new();
        for raw in [
            r#"{"type":"ping"}"#,
            r#"{"type":"ping","username":"server","message":"keepalive"}"#,
        ] {
            assert_eq!(dispatch_frame(raw, &mut sink), Dispatch::Filtered);
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_malformed_frame_dropped() {
        let mut sink: Vec<DisplayLine> = Vec::new();
        assert_eq!(dispatch_frame("{oops", &mut sink), Dispatch::Malformed);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let mut sink: Vec<DisplayLine> = Vec::new();
        dispatch_frame(r#"{"username":"a","message":"1"}"#, &mut sink);
        dispatch_frame(r#"{"type":"ping"}"#, &mut sink);
        dispatch_frame(r#"{"type":"info","message":"2"}"#, &mut sink);
        dispatch_frame(r#"{"username":"b","message":"3"}"#, &mut sink);

        let texts: Vec<_> = sink.iter().filter_map(|l| l.text.as_deref()).collect();
        assert_eq!(texts, ["1", "2", "3"]);
        assert_eq!(sink[0].kind, FrameKind::Message);
        assert_eq!(sink[1].kind, FrameKind::Info);
    }
}
