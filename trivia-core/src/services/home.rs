//! Home feed interaction loop
//!
//! `HomeFeed` is the single owner of the feed cache, the review cursor and the
//! drag state. Page loads run on background tasks and report back over a
//! channel; each result carries the filter generation it was issued under so
//! results for a replaced filter are dropped before they touch the feed.
//!
//! Loads for one filter are strictly sequential: a second page is never
//! requested while one is outstanding.

use super::feed::{Feed, FeedFilter, FeedLoader, Page};
use super::auth::AuthState;
use super::gesture::{DragRelease, GestureState, GestureTracker, SwipeDirection};
use super::reactions::{ReactionOutcome, ReactionService};
use super::review::{needs_prefetch, ReviewPhase, ReviewState};
use crate::domain::{ContentItem, Language, ReactionKind};
use crate::error::ServiceResult;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct PageLoaded {
    generation: u64,
    result: ServiceResult<Page>,
}

/// What happened when a background load came back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    PageApplied { appended: usize, is_end: bool },
    LoadFailed { message: String },
    /// Result belonged to a filter that is no longer active
    StaleDiscarded,
}

/// Effects of moving past a card
#[derive(Debug)]
pub struct AdvanceOutcome {
    pub item_id: String,
    pub kind: ReactionKind,
    /// Index now shown
    pub index: usize,
    pub wrapped: bool,
    /// A next-page load was started by this move
    pub prefetching: bool,
    /// Detached reaction task; may be dropped
    pub reaction: JoinHandle<ReactionOutcome>,
}

#[derive(Debug)]
pub enum SwipeResult {
    Cancelled,
    Committed {
        direction: SwipeDirection,
        exit_x: f32,
        outcome: AdvanceOutcome,
    },
}

/// Tunables for the loop
#[derive(Debug, Clone, Copy)]
pub struct HomeOptions {
    pub prefetch_margin: usize,
    pub commit_threshold: f32,
    pub viewport_width: f32,
}

pub struct HomeFeed {
    loader: FeedLoader,
    reactions: ReactionService,
    filter: FeedFilter,
    feed: Feed,
    review: ReviewState,
    gesture: GestureTracker,
    prefetch_margin: usize,
    viewer: watch::Receiver<AuthState>,
    generation: u64,
    in_flight: bool,
    pending: usize,
    last_error: Option<String>,
    tx: mpsc::UnboundedSender<PageLoaded>,
    rx: mpsc::UnboundedReceiver<PageLoaded>,
}

impl HomeFeed {
    pub fn new(
        loader: FeedLoader,
        reactions: ReactionService,
        filter: FeedFilter,
        viewer: watch::Receiver<AuthState>,
        options: HomeOptions,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            loader,
            reactions,
            filter,
            feed: Feed::new(),
            review: ReviewState::new(),
            gesture: GestureTracker::new(options.viewport_width, options.commit_threshold),
            prefetch_margin: options.prefetch_margin,
            viewer,
            generation: 0,
            in_flight: false,
            pending: 0,
            last_error: None,
            tx,
            rx,
        }
    }

    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn review(&self) -> &ReviewState {
        &self.review
    }

    pub fn gesture(&self) -> &GestureTracker {
        &self.gesture
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn phase(&self) -> ReviewPhase {
        self.review
            .phase(self.feed.len(), self.in_flight, self.feed.is_end())
    }

    pub fn current_item(&self) -> Option<&ContentItem> {
        self.feed.get(self.review.current_index())
    }

    /// Load the first page for the current filter
    pub fn start(&mut self) -> bool {
        self.request_page()
    }

    /// Switch category. Returns false when the filter is unchanged.
    pub fn select_category(&mut self, category_id: Option<String>) -> bool {
        if self.filter.category_id == category_id {
            return false;
        }
        let filter = self.filter.clone().with_category(category_id);
        self.replace_filter(filter);
        true
    }

    /// Switch content language. The category is kept.
    pub fn set_language(&mut self, language: Language) -> bool {
        if self.filter.language == language {
            return false;
        }
        let filter = FeedFilter {
            language,
            category_id: self.filter.category_id.clone(),
        };
        self.replace_filter(filter);
        true
    }

    fn replace_filter(&mut self, filter: FeedFilter) {
        info!(
            category = ?filter.category_id,
            language = %filter.language,
            "Feed filter changed"
        );
        self.filter = filter;
        self.generation += 1;
        self.feed.reset();
        self.review.reset();
        self.gesture.cancel();
        self.in_flight = false;
        self.last_error = None;
        self.request_page();
    }

    /// Start loading the next page in the background. Returns false when a
    /// load is already outstanding for this filter or the feed is exhausted.
    pub fn request_page(&mut self) -> bool {
        if self.in_flight || self.feed.is_end() {
            return false;
        }
        self.in_flight = true;
        self.pending += 1;

        let loader = self.loader.clone();
        let filter = self.filter.clone();
        let cursor = self.feed.cursor().clone();
        let generation = self.generation;
        let tx = self.tx.clone();
        debug!(generation, cursor = ?cursor.token(), "Requesting feed page");

        tokio::spawn(async move {
            let result = loader.load_page(&cursor, &filter).await;
            if tx.send(PageLoaded { generation, result }).is_err() {
                debug!(generation, "Feed dropped before page arrived");
            }
        });
        true
    }

    /// Re-issue the load after a failure, from the unchanged cursor
    pub fn retry(&mut self) -> bool {
        self.last_error = None;
        self.request_page()
    }

    /// Wait for the next load result. `None` when nothing is outstanding.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        if self.pending == 0 {
            return None;
        }
        let loaded = self.rx.recv().await?;
        Some(self.apply(loaded))
    }

    /// Apply every load result that has already arrived
    pub fn poll_events(&mut self) -> Vec<FeedEvent> {
        let mut events = Vec::new();
        while let Ok(loaded) = self.rx.try_recv() {
            events.push(self.apply(loaded));
        }
        events
    }

    /// Wait until every outstanding load, stale ones included, has reported
    pub async fn settle(&mut self) -> Vec<FeedEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn apply(&mut self, loaded: PageLoaded) -> FeedEvent {
        self.pending = self.pending.saturating_sub(1);
        if loaded.generation != self.generation {
            debug!(
                generation = loaded.generation,
                current = self.generation,
                "Discarding page for a replaced filter"
            );
            return FeedEvent::StaleDiscarded;
        }
        self.in_flight = false;

        match loaded.result {
            Ok(page) => {
                let is_end = page.is_end();
                let appended = self.feed.apply_page(page);
                self.review.clamp(self.feed.len());
                self.last_error = None;
                debug!(appended, is_end, total = self.feed.len(), "Feed page applied");
                // Nothing to show yet and more pages exist: keep paging
                if appended == 0 && self.feed.is_empty() && !is_end {
                    self.request_page();
                }
                FeedEvent::PageApplied { appended, is_end }
            }
            Err(e) => {
                warn!(error = %e, "Feed page load failed");
                let message = e.to_string();
                self.last_error = Some(message.clone());
                FeedEvent::LoadFailed { message }
            }
        }
    }

    pub fn reveal(&mut self) -> bool {
        self.review.reveal(self.feed.len())
    }

    pub fn dismiss(&mut self) -> bool {
        self.review.dismiss()
    }

    /// React to the current card and move to the next one.
    /// `None` on an empty feed.
    pub fn advance(&mut self, kind: ReactionKind) -> Option<AdvanceOutcome> {
        let item_id = self.current_item()?.id.clone();
        let step = self.review.advance(self.feed.len())?;
        self.gesture.cancel();

        // History goes to whoever is signed in when the reaction fires
        let viewer = self.viewer.borrow().uid().map(str::to_string);
        let reaction = self.reactions.spawn_detached(viewer, item_id.clone(), kind);

        let prefetching = needs_prefetch(
            step.to,
            self.feed.len(),
            self.prefetch_margin,
            self.feed.is_end(),
        ) && self.request_page();

        debug!(
            item_id = %item_id,
            kind = %kind,
            index = step.to,
            wrapped = step.wrapped,
            prefetching,
            "Advanced to next card"
        );

        Some(AdvanceOutcome {
            item_id,
            kind,
            index: step.to,
            wrapped: step.wrapped,
            prefetching,
            reaction,
        })
    }

    pub fn drag_update(&mut self, dx: f32, dy: f32) -> GestureState {
        self.gesture.update(dx, dy)
    }

    /// Lift the pointer. A committed swipe advances exactly once.
    pub fn drag_release(&mut self) -> SwipeResult {
        match self.gesture.release() {
            DragRelease::Cancel => SwipeResult::Cancelled,
            DragRelease::Commit { direction, exit_x } => {
                match self.advance(direction.reaction()) {
                    Some(outcome) => SwipeResult::Committed {
                        direction,
                        exit_x,
                        outcome,
                    },
                    None => SwipeResult::Cancelled,
                }
            }
        }
    }
}
