use std::fmt::Debug;
use tokio::sync::{broadcast, watch};

pub struct PropertySubscriber {
    receiver: broadcast::Receiver<()>,
}

// PropertySubscriber intentionally does not implement Clone.
// Each subscriber should be unique to avoid conflicts.
// To get multiple subscribers, call Property::subscribe() multiple times.

impl PropertySubscriber {
    pub async fn wait_for_change(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(_) => return true,
                // If we lagged behind, skip to the latest and keep waiting
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                // Channel closed: no more updates
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }

    pub fn try_recv(&mut self) -> bool {
        match self.receiver.try_recv() {
            Ok(_) => true,
            Err(broadcast::error::TryRecvError::Empty) => false,
            // Consider lag as a change signal; the next recv() will align
            Err(broadcast::error::TryRecvError::Lagged(_)) => true,
            Err(broadcast::error::TryRecvError::Closed) => false,
        }
    }
}

/// Observable value.
///
/// `subscribe` hands out change pings, `watch` hands out a receiver that
/// always starts from the latest value.
pub struct Property<T: Clone + Send + Sync> {
    watch_sender: watch::Sender<T>,
    watch_receiver: watch::Receiver<T>,
    broadcast_sender: broadcast::Sender<()>,
    name: String,
}

impl<T: Clone + Send + Sync> Property<T> {
    pub fn new(initial_value: T, name: impl Into<String>) -> Self {
        let (watch_sender, watch_receiver) = watch::channel(initial_value);
        let (broadcast_sender, _) = broadcast::channel(100);
        Self {
            watch_sender,
            watch_receiver,
            broadcast_sender,
            name: name.into(),
        }
    }

    pub fn get_sync(&self) -> T {
        self.watch_receiver.borrow().clone()
    }

    pub fn set(&self, new_value: T) {
        self.watch_sender.send_replace(new_value);
        let _ = self.broadcast_sender.send(());
    }

    pub fn subscribe(&self) -> PropertySubscriber {
        PropertySubscriber {
            receiver: self.broadcast_sender.subscribe(),
        }
    }

    /// Receiver primed with the current value
    pub fn watch(&self) -> watch::Receiver<T> {
        self.watch_sender.subscribe()
    }
}

impl<T: Clone + Send + Sync + PartialEq> Property<T> {
    /// Set the value, notifying subscribers only if it actually changed
    pub fn set_if_changed(&self, new_value: T) -> bool {
        let changed = self.watch_sender.send_if_modified(|current| {
            if *current == new_value {
                false
            } else {
                *current = new_value;
                true
            }
        });
        if changed {
            let _ = self.broadcast_sender.send(());
        }
        changed
    }
}

impl<T: Clone + Send + Sync + Debug> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Property({} = {:?})", self.name, self.get_sync())
    }
}
