//! Session state

/// Identity of the logged-in user, if any
///
/// Owned by a single event loop, so no interior locking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Replace the identity. Empty names leave the session anonymous.
    pub fn set_identity(&mut self, identity: impl Into<String>) {
        let identity = identity.into();
        self.identity = if identity.is_empty() { None } else { Some(identity) };
    }

    /// Clear the identity, returning the previous one
    pub fn clear(&mut self) -> Option<String> {
        self.identity.take()
    }
}
