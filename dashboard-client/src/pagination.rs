//! Paginated list fetching shared by the Users and Reports pages.
//!
//! A [`PagedList`] holds exactly one page at a time. Every fetch replaces it
//! wholesale, and every fetch takes a sequence number so that a response
//! arriving after a newer fetch was dispatched is thrown away instead of
//! overwriting fresher data.

use std::{
    fmt,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use shared::models::{PageResult, Paginated};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Something that can produce one page of rows.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Row type.
    type Item: Clone + Send + Sync;
    /// Query narrowing applied to every page.
    type Filters: Clone + Default + Send + Sync;

    /// Fetches the 1-based `page` narrowed by `filters`.
    async fn fetch_page(
        &self,
        page: u32,
        filters: &Self::Filters,
    ) -> Result<Paginated<Self::Item>, ApiError>;
}

/// What happened to a fetch that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the held page.
    Applied,
    /// A newer fetch was dispatched first; the response was discarded.
    Stale,
    /// Navigation was not allowed; nothing was sent.
    Unavailable,
}

struct ListState<T, F> {
    current: Option<PageResult<T>>,
    page_index: u32,
    filters: F,
    loading: bool,
}

/// One page of `S::Item` plus its navigation state.
pub struct PagedList<S: PageSource> {
    source: S,
    state: Mutex<ListState<S::Item, S::Filters>>,
    sequence: AtomicU64,
}

impl<S: PageSource> fmt::Debug for PagedList<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("PagedList")
            .field("page_index", &state.page_index)
            .field(
                "items",
                &state.current.as_ref().map_or(0, |page| page.items.len()),
            )
            .field("loading", &state.loading)
            .finish_non_exhaustive()
    }
}

impl<S: PageSource> PagedList<S> {
    /// Empty list over `source`; nothing is fetched until asked.
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(ListState {
                current: None,
                page_index: 1,
                filters: S::Filters::default(),
                loading: false,
            }),
            sequence: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<S::Item, S::Filters>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches `page` with the stored filters. Page 0 is treated as page 1.
    ///
    /// # Errors
    /// Returns the source error when this is still the latest fetch; the
    /// held page is cleared in that case.
    pub async fn fetch_page(&self, page: u32) -> Result<FetchOutcome, ApiError> {
        let page = page.max(1);
        let (ticket, filters) = {
            let mut state = self.lock();
            let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            (ticket, state.filters.clone())
        };

        let result = self.source.fetch_page(page, &filters).await;

        let mut state = self.lock();
        if self.sequence.load(Ordering::SeqCst) != ticket {
            debug!(page, ticket, "discarding stale page response");
            return Ok(FetchOutcome::Stale);
        }
        state.loading = false;
        match result {
            Ok(response) => {
                let next = PageResult::from_response(page, response);
                debug!(page, total = next.total_count, rows = next.items.len(), "page loaded");
                state.page_index = next.page_index;
                state.current = Some(next);
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                warn!(page, error = %err, "failed to fetch page");
                state.current = None;
                Err(err)
            }
        }
    }

    /// Stores `filters` and fetches page 1.
    ///
    /// # Errors
    /// As for [`Self::fetch_page`].
    pub async fn search(&self, filters: S::Filters) -> Result<FetchOutcome, ApiError> {
        self.search_at(filters, 1).await
    }

    /// Stores `filters` and fetches `page` directly.
    ///
    /// # Errors
    /// As for [`Self::fetch_page`].
    pub async fn search_at(&self, filters: S::Filters, page: u32) -> Result<FetchOutcome, ApiError> {
        self.lock().filters = filters;
        self.fetch_page(page).await
    }

    /// Re-fetches the current page.
    ///
    /// # Errors
    /// As for [`Self::fetch_page`].
    pub async fn refresh(&self) -> Result<FetchOutcome, ApiError> {
        let page = self.page_index();
        self.fetch_page(page).await
    }

    /// Steps forward one page when the server reported one.
    ///
    /// # Errors
    /// As for [`Self::fetch_page`].
    pub async fn next(&self) -> Result<FetchOutcome, ApiError> {
        let target = {
            let state = self.lock();
            match &state.current {
                Some(page) if page.can_go_next() => page.page_index.saturating_add(1),
                _ => return Ok(FetchOutcome::Unavailable),
            }
        };
        self.fetch_page(target).await
    }

    /// Steps back one page when not on the first.
    ///
    /// # Errors
    /// As for [`Self::fetch_page`].
    pub async fn previous(&self) -> Result<FetchOutcome, ApiError> {
        let target = {
            let state = self.lock();
            match &state.current {
                Some(page) if page.can_go_previous() => page.page_index - 1,
                _ => return Ok(FetchOutcome::Unavailable),
            }
        };
        self.fetch_page(target).await
    }

    /// Whether "next" is offered.
    #[must_use]
    pub fn can_next(&self) -> bool {
        self.lock().current.as_ref().is_some_and(PageResult::can_go_next)
    }

    /// Whether "previous" is offered.
    #[must_use]
    pub fn can_previous(&self) -> bool {
        self.lock()
            .current
            .as_ref()
            .is_some_and(PageResult::can_go_previous)
    }

    /// Copy of the held page.
    #[must_use]
    pub fn current(&self) -> Option<PageResult<S::Item>> {
        self.lock().current.clone()
    }

    /// Rows on the held page; empty when nothing is loaded.
    #[must_use]
    pub fn items(&self) -> Vec<S::Item> {
        self.lock()
            .current
            .as_ref()
            .map(|page| page.items.clone())
            .unwrap_or_default()
    }

    /// Total reported by the last applied page.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.lock().current.as_ref().map_or(0, |page| page.total_count)
    }

    /// 1-based index of the held page, or of the last one applied.
    #[must_use]
    pub fn page_index(&self) -> u32 {
        self.lock().page_index
    }

    /// `"{shown} of {total}"`, or `"0 of 0"` before the first load.
    #[must_use]
    pub fn summary(&self) -> String {
        self.lock()
            .current
            .as_ref()
            .map_or_else(|| "0 of 0".to_string(), PageResult::summary)
    }

    /// Latest dispatched fetch has not completed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Drops rows matching `predicate` from the held page. The total is kept.
    pub fn remove_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&S::Item) -> bool,
    {
        let mut state = self.lock();
        let Some(page) = state.current.as_mut() else {
            return 0;
        };
        let before = page.items.len();
        page.items.retain(|item| !predicate(item));
        before - page.items.len()
    }
}
