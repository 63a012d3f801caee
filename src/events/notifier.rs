use std::collections::BTreeSet;
use tokio::sync::mpsc;
use tracing::trace;

use super::types::ChangeEvent;
use crate::models::IndexPath;

/// Sink for incremental list changes.
///
/// Called on whichever task completed the operation that caused the change;
/// implementations that need a particular thread must hop there themselves.
pub trait ChangeNotifier: Send + Sync {
    /// All data was replaced
    fn on_reset(&self);

    /// Sections were appended at `sections`
    fn on_sections_appended(&self, sections: &BTreeSet<usize>);

    /// Items at `positions` changed in place
    fn on_items_changed(&self, positions: &BTreeSet<IndexPath>);

    fn notify(&self, event: &ChangeEvent) {
        match event {
            ChangeEvent::Reset => self.on_reset(),
            ChangeEvent::SectionsAppended(sections) => self.on_sections_appended(sections),
            ChangeEvent::ItemsChanged(positions) => self.on_items_changed(positions),
        }
    }
}

/// Forwards changes as [`ChangeEvent`]s over a channel, for renderers on another task
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<ChangeEvent>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChangeEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: ChangeEvent) {
        // A closed receiver means the renderer is gone; nothing left to update
        if self.sender.send(event).is_err() {
            trace!("Change event dropped, receiver closed");
        }
    }
}

impl ChangeNotifier for ChannelNotifier {
    fn on_reset(&self) {
        self.send(ChangeEvent::Reset);
    }

    fn on_sections_appended(&self, sections: &BTreeSet<usize>) {
        self.send(ChangeEvent::SectionsAppended(sections.clone()));
    }

    fn on_items_changed(&self, positions: &BTreeSet<IndexPath>) {
        self.send(ChangeEvent::ItemsChanged(positions.clone()));
    }
}
