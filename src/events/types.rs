use std::collections::BTreeSet;

use crate::models::IndexPath;

/// Structural change to the paged list, as seen by a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Everything was replaced; reload from scratch
    Reset,
    /// New sections were added at these indices
    SectionsAppended(BTreeSet<usize>),
    /// Items at these positions changed in place
    ItemsChanged(BTreeSet<IndexPath>),
}

impl ChangeEvent {
    pub fn section_appended(section: usize) -> Self {
        ChangeEvent::SectionsAppended(BTreeSet::from([section]))
    }

    pub fn item_changed(position: IndexPath) -> Self {
        ChangeEvent::ItemsChanged(BTreeSet::from([position]))
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, ChangeEvent::ItemsChanged(_))
    }
}
