use crate::remote::Identity;

/// Session-wide context: who is signed in and whether the host reports
/// connectivity.
///
/// Replaces the ambient globals of a browser session with an explicit
/// record; the host feeds transitions in through the app-services event
/// handlers.
#[derive(Debug, Clone)]
pub struct SessionContext {
    identity: Option<Identity>,
    online: bool,
}

impl SessionContext {
    /// Fresh context: no identity, assumed online until told otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            identity: None,
            online: true,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn online(&self) -> bool {
        self.online
    }

    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    /// Marks the context online. Returns true only on an offline→online
    /// transition, so the caller can flush exactly once per transition.
    pub fn set_online(&mut self) -> bool {
        let was_online = self.online;
        self.online = true;
        !was_online
    }

    pub fn set_offline(&mut self) {
        self.online = false;
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
