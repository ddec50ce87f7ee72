use serde::Serialize;
use tokio::sync::broadcast;

const SIGNAL_CAPACITY: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The user asked to log out.
    Logout,
    /// Authorization could not be recovered (renewal failed or the retry was
    /// rejected).
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionEnded {
    pub reason: EndReason,
}

/// "Session ended" broadcast. Cloning shares the same channel.
#[derive(Clone, Debug)]
pub struct SessionSignal {
    tx: broadcast::Sender<SessionEnded>,
}

impl SessionSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEnded> {
        self.tx.subscribe()
    }

    pub(crate) fn emit(&self, reason: EndReason) {
        // No subscribers is fine; the signal is advisory.
        let _ = self.tx.send(SessionEnded { reason });
    }
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new()
    }
}
