use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use tracing::{debug, error, info, trace, warn};

use super::{Property, PropertySubscriber, ViewModel};
use crate::backends::{ApiError, MediaClient};
use crate::constants::{DEFAULT_PAGE_LIMIT, PREFETCH_COUNT};
use crate::events::{ChangeEvent, ChangeNotifier};
use crate::models::{IndexPath, MediaItem, MediaItemId};
use crate::state::{ChildrenState, LastCursor, PageStore};

/// Top-level fetch state. Initial load and load-more share it, so only one
/// page request is ever in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    LoadingInitial,
    LoadingMore,
}

#[derive(Debug)]
struct ListState {
    store: PageStore,
    phase: LoadPhase,
}

/// Drives paging of the media list.
///
/// State is only touched inside short synchronous sections; the client calls
/// are the only await points and no lock is held across them. `is_loading`
/// is written under the same lock as the load phase so the two never disagree. Change events
/// go to a weakly held [`ChangeNotifier`] after the state update is visible.
pub struct MediaListViewModel {
    client: Arc<dyn MediaClient>,
    page_limit: u32,
    prefetch_count: usize,
    state: Mutex<ListState>,
    notifier: RwLock<Option<Weak<dyn ChangeNotifier>>>,
    is_loading: Property<bool>,
    error: Property<Option<ApiError>>,
}

/// Puts bookkeeping back if a fetch future is dropped before the response arrives
struct InFlight<'a> {
    view_model: &'a MediaListViewModel,
    children_of: Option<&'a MediaItemId>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn top_level(view_model: &'a MediaListViewModel) -> Self {
        Self {
            view_model,
            children_of: None,
            armed: true,
        }
    }

    fn children(view_model: &'a MediaListViewModel, id: &'a MediaItemId) -> Self {
        Self {
            view_model,
            children_of: Some(id),
            armed: true,
        }
    }

    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.children_of {
            Some(id) => {
                warn!("Children fetch for {} dropped before completion", id);
                self.view_model.state().store.finish_children_fetch(id.as_str());
            }
            None => {
                warn!("Page fetch dropped before completion");
                let mut state = self.view_model.state();
                state.phase = LoadPhase::Idle;
                self.view_model.is_loading.set_if_changed(false);
            }
        }
    }
}

impl std::fmt::Debug for MediaListViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaListViewModel")
            .field("client", &self.client)
            .field("page_limit", &self.page_limit)
            .field("prefetch_count", &self.prefetch_count)
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl MediaListViewModel {
    pub fn new(client: Arc<dyn MediaClient>) -> Self {
        Self {
            client,
            page_limit: DEFAULT_PAGE_LIMIT,
            prefetch_count: PREFETCH_COUNT,
            state: Mutex::new(ListState {
                store: PageStore::new(),
                phase: LoadPhase::Idle,
            }),
            notifier: RwLock::new(None),
            is_loading: Property::new(false, "is_loading"),
            error: Property::new(None, "error"),
        }
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        // Critical sections never panic midway, so a poisoned lock still holds consistent data
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach the renderer. Only a weak reference is kept; once the renderer
    /// is dropped, change events are silently discarded.
    pub fn set_notifier<N: ChangeNotifier + 'static>(&self, notifier: &Arc<N>) {
        let weak = Arc::downgrade(notifier) as Weak<dyn ChangeNotifier>;
        *self.notifier.write().unwrap_or_else(PoisonError::into_inner) = Some(weak);
    }

    fn dispatch(&self, event: ChangeEvent) {
        let notifier = self
            .notifier
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade);

        match notifier {
            Some(notifier) => {
                trace!("Dispatching {:?}", event);
                notifier.notify(&event);
            }
            None => trace!("No notifier attached, dropping {:?}", event),
        }
    }

    fn record_error(&self, error: ApiError) {
        self.error.set(Some(error));
    }

    /// Load the first page, replacing everything loaded so far.
    ///
    /// Ignored while any page request is in flight.
    pub async fn initial_data_load(&self) {
        {
            let mut state = self.state();
            if state.phase != LoadPhase::Idle {
                debug!("Initial load skipped, already {:?}", state.phase);
                return;
            }
            state.phase = LoadPhase::LoadingInitial;
            self.is_loading.set_if_changed(true);
        }
        info!("Loading first page (limit {})", self.page_limit);

        let guard = InFlight::top_level(self);
        let result = self.client.fetch_first_page(self.page_limit).await;
        guard.complete();

        let outcome = {
            let mut state = self.state();
            state.phase = LoadPhase::Idle;
            self.is_loading.set_if_changed(false);
            result.map(|page| {
                debug!("First page holds {} items", page.len());
                state.store.reset(page);
            })
        };

        match outcome {
            Ok(()) => {
                self.error.set_if_changed(None);
                self.dispatch(ChangeEvent::Reset);
            }
            Err(e) => {
                error!("Failed to load first page: {}", e);
                self.record_error(e);
            }
        }
    }

    /// Load the page after the last one, if there is one and nothing else is loading.
    ///
    /// Does nothing before the first [`initial_data_load`](Self::initial_data_load) succeeded.
    pub async fn load_more(&self) {
        let cursor = {
            let mut state = self.state();
            if state.phase != LoadPhase::Idle {
                trace!("Load more skipped, already {:?}", state.phase);
                return;
            }
            let cursor = match state.store.last_page_cursor() {
                LastCursor::Next(cursor) => cursor.clone(),
                LastCursor::NoPages => {
                    debug!("Load more skipped, no first page yet");
                    return;
                }
                LastCursor::End => {
                    trace!("Load more skipped, no more pages");
                    return;
                }
            };
            state.phase = LoadPhase::LoadingMore;
            self.is_loading.set_if_changed(true);
            cursor
        };
        debug!("Loading next page from {}", cursor.url().path());

        let guard = InFlight::top_level(self);
        let result = self.client.fetch_page(&cursor).await;
        guard.complete();

        let outcome = {
            let mut state = self.state();
            state.phase = LoadPhase::Idle;
            self.is_loading.set_if_changed(false);
            result.map(|page| state.store.append(page))
        };

        match outcome {
            Ok(section) => {
                info!("Appended page as section {}", section);
                self.dispatch(ChangeEvent::section_appended(section));
            }
            Err(e) => {
                error!("Failed to load next page: {}", e);
                self.record_error(e);
            }
        }
    }

    /// Whether showing the item at `section`/`row` should trigger [`load_more`](Self::load_more):
    /// true within the last `prefetch_count` rows of the last section.
    pub fn can_prefetch(&self, section: usize, row: usize) -> bool {
        let state = self.state();
        let sections = state.store.section_count();
        if sections == 0 || section != sections - 1 {
            return false;
        }
        row + self.prefetch_count > state.store.row_count(section)
    }

    /// Fetch an album's children once.
    ///
    /// Ignored when they are already stored or being fetched. After a failure,
    /// or a response without a children list, the album can be requested again.
    pub async fn fetch_children_for_item(&self, id: &MediaItemId) {
        {
            let mut state = self.state();
            if state.store.has_children(id.as_str()) {
                trace!("Children of {} already fetched", id);
                return;
            }
            if !state.store.begin_children_fetch(id) {
                trace!("Children of {} already being fetched", id);
                return;
            }
        }
        debug!("Fetching children of {}", id);

        let guard = InFlight::children(self, id);
        let result = self.client.fetch_children(id).await;
        guard.complete();

        let position = {
            let mut state = self.state();
            state.store.finish_children_fetch(id.as_str());
            match result {
                Ok(Some(children)) => {
                    debug!("Album {} has {} children", id, children.len());
                    state.store.record_children(id.clone(), children);
                    state.store.locate(id.as_str())
                }
                // Nothing stored, so a later request tries again
                Ok(None) => {
                    debug!("No children data for album {}, leaving it unfetched", id);
                    return;
                }
                Err(e) => {
                    error!("Failed to fetch children of {}: {}", id, e);
                    drop(state);
                    self.record_error(e);
                    return;
                }
            }
        };

        match position {
            Some(position) => self.dispatch(ChangeEvent::item_changed(position)),
            None => debug!("Album {} is no longer listed, nothing to refresh", id),
        }
    }

    pub fn children_for(&self, id: &MediaItemId) -> Vec<MediaItem> {
        self.state().store.children_for(id.as_str()).to_vec()
    }

    pub fn has_children(&self, id: &MediaItemId) -> bool {
        self.state().store.has_children(id.as_str())
    }

    pub fn children_state(&self, id: &MediaItemId) -> ChildrenState {
        self.state().store.children_state(id.as_str())
    }

    pub fn item_at(&self, section: usize, row: usize) -> Option<MediaItem> {
        self.state().store.item_at(section, row).cloned()
    }

    pub fn locate(&self, id: &MediaItemId) -> Option<IndexPath> {
        self.state().store.locate(id.as_str())
    }

    pub fn section_count(&self) -> usize {
        self.state().store.section_count()
    }

    pub fn row_count(&self, section: usize) -> usize {
        self.state().store.row_count(section)
    }

    pub fn can_load_more(&self) -> bool {
        self.state().store.can_load_more()
    }

    /// Top-level items across all sections
    pub fn item_count(&self) -> usize {
        self.state().store.item_count()
    }

    pub fn prefetch_count(&self) -> usize {
        self.prefetch_count
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.state().phase
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get_sync()
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.error.get_sync()
    }

    /// Clear the error once the user has seen it
    pub fn dismiss_error(&self) {
        self.error.set_if_changed(None);
    }

    pub fn is_loading_property(&self) -> &Property<bool> {
        &self.is_loading
    }

    pub fn error_property(&self) -> &Property<Option<ApiError>> {
        &self.error
    }
}

#[async_trait]
impl ViewModel for MediaListViewModel {
    async fn initialize(&self) {
        if self.section_count() == 0 {
            self.initial_data_load().await;
        }
    }

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "is_loading" => Some(self.is_loading.subscribe()),
            "error" => Some(self.error.subscribe()),
            _ => None,
        }
    }

    async fn refresh(&self) {
        self.initial_data_load().await;
    }
}
