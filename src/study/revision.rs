use std::sync::Arc;

use tokio::sync::watch;

/// Change counter shared by the controllers. Every state mutation bumps it
/// once; the GUI watches it to know when to repaint.
#[derive(Debug, Clone)]
pub struct Revision {
    sender: Arc<watch::Sender<u64>>,
}

impl Revision {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self { sender: Arc::new(sender) }
    }

    pub fn bump(&self) {
        self.sender.send_modify(|revision| *revision += 1);
    }

    pub fn current(&self) -> u64 {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bump_notifies_subscribers() {
        let revision = Revision::new();
        let mut receiver = revision.subscribe();

        revision.bump();
        receiver.changed().await.unwrap();
        assert_eq!(*receiver.borrow_and_update(), 1);

        let clone = revision.clone();
        clone.bump();
        assert_eq!(revision.current(), 2);
    }
}
