//! Timeline pagination.
//!
//! `PaginationWalker` fetches one page of a user's timeline at a time, each
//! through a freshly acquired session, and decides after every page whether
//! to go on. The walk stops when:
//! - the server reports no next page
//! - the server hands back the cursor that was just used (cycle)
//! - `max_pages` pages have been fetched (0 = unbounded)
//! - a post older than the date cutoff shows up; posts are newest-first, so
//!   the rest of the timeline is older still
//! - a page fetch fails; the walker does not retry, it ends the walk

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use log::{debug, info, warn};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error_handling::FailureReason;
use crate::extract::{extract_timeline_page, TimelinePage};
use crate::fetch::{timeline_request, FetchOutcome, ProxiedFetcher};
use crate::models::PostRecord;
use crate::proxy::SessionProvider;

/// Bounds of one timeline walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Posts requested per page
    pub page_size: usize,
    /// Maximum pages to fetch, 0 for no limit
    pub max_pages: usize,
    /// Oldest creation timestamp (Unix seconds, inclusive) to emit
    pub date_cutoff: Option<i64>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: 0,
            date_cutoff: None,
        }
    }
}

/// Why a walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    NoNextPage,
    /// The server returned the cursor that was just requested
    CursorCycle,
    MaxPages,
    DateCutoff,
    /// Session acquisition, page fetch or page extraction failed
    FetchFailed(FailureReason),
}

impl StopReason {
    /// Whether the walk reached a natural end rather than an error.
    pub fn is_complete(&self) -> bool {
        !matches!(self, StopReason::FetchFailed(_))
    }
}

/// Everything a finished walk produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutcome {
    pub posts: Vec<PostRecord>,
    pub pages: usize,
    pub stop_reason: StopReason,
}

/// Lazy, finite, non-restartable walk over one user's timeline.
pub struct PaginationWalker<P: SessionProvider + ?Sized> {
    user_id: String,
    provider: Arc<P>,
    fetcher: ProxiedFetcher,
    options: WalkOptions,
    after: Option<String>,
    pages: usize,
    stop_reason: Option<StopReason>,
}

impl<P: SessionProvider + ?Sized> PaginationWalker<P> {
    pub fn new(
        user_id: impl Into<String>,
        provider: Arc<P>,
        fetcher: ProxiedFetcher,
        options: WalkOptions,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            provider,
            fetcher,
            options,
            after: None,
            pages: 0,
            stop_reason: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Set once the walk has ended.
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.stop_reason.is_some()
    }

    /// Fetches the next page and returns its posts, or `None` once the walk
    /// has ended. A page that triggers a stop condition still returns the
    /// posts it contributed; the following call returns `None`.
    pub async fn next_page(&mut self) -> Option<Vec<PostRecord>> {
        if self.stop_reason.is_some() {
            return None;
        }

        let page = match self.fetch_page().await {
            Ok(page) => page,
            Err(reason) => {
                warn!(
                    "Walk of user {} ended after {} page(s): {}",
                    self.user_id, self.pages, reason
                );
                self.stop_reason = Some(StopReason::FetchFailed(reason));
                return None;
            }
        };

        self.pages += 1;
        if self.pages == 1 {
            match page.total_count {
                Some(total) => info!("Scraping total {} posts of user {}", total, self.user_id),
                None => info!("Scraping posts of user {}", self.user_id),
            }
        } else {
            info!("Scraping posts page {} of user {}", self.pages, self.user_id);
        }

        let (posts, cut) = apply_date_cutoff(page.posts, self.options.date_cutoff);
        let stop = if cut {
            Some(StopReason::DateCutoff)
        } else {
            self.advance_cursor(page.cursor.has_next, page.cursor.token)
        };
        self.stop_reason = stop.or_else(|| {
            let limited = self.options.max_pages > 0 && self.pages >= self.options.max_pages;
            limited.then_some(StopReason::MaxPages)
        });

        if let Some(reason) = &self.stop_reason {
            debug!("Walk of user {} stopped: {:?}", self.user_id, reason);
        }
        Some(posts)
    }

    /// Drives the walk to the end.
    pub async fn collect(mut self) -> WalkOutcome {
        let mut posts = Vec::new();
        while let Some(page) = self.next_page().await {
            posts.extend(page);
        }
        WalkOutcome {
            posts,
            pages: self.pages,
            // next_page only returns None once a reason is set
            stop_reason: self.stop_reason.unwrap_or(StopReason::NoNextPage),
        }
    }

    /// The walk as a stream of posts, newest first.
    pub fn into_stream(self) -> impl Stream<Item = PostRecord> {
        stream::unfold(self, |mut walker| async move {
            let page = walker.next_page().await?;
            Some((stream::iter(page), walker))
        })
        .flatten()
    }

    async fn fetch_page(&self) -> Result<TimelinePage, FailureReason> {
        // A new session per page; dropped when this call returns.
        let session = self.provider.acquire().await?;
        let request = timeline_request(
            &self.user_id,
            self.options.page_size,
            self.after.as_deref(),
            session.endpoints(),
        );
        match self.fetcher.execute(&request, &session).await {
            FetchOutcome::Success(payload) => Ok(extract_timeline_page(&payload)?),
            FetchOutcome::Failure(reason) => Err(reason),
        }
    }

    /// Moves to the next cursor, or says why not.
    fn advance_cursor(&mut self, has_next: bool, token: Option<String>) -> Option<StopReason> {
        if !has_next {
            return Some(StopReason::NoNextPage);
        }
        match token {
            None => Some(StopReason::NoNextPage),
            Some(token) if self.after.as_deref() == Some(token.as_str()) => {
                warn!(
                    "Cursor {} repeated for user {}, stopping walk",
                    token, self.user_id
                );
                Some(StopReason::CursorCycle)
            }
            Some(token) => {
                self.after = Some(token);
                None
            }
        }
    }
}

/// Keeps posts up to (not including) the first one older than `cutoff`.
///
/// Returns the kept posts and whether anything was cut.
pub fn apply_date_cutoff(posts: Vec<PostRecord>, cutoff: Option<i64>) -> (Vec<PostRecord>, bool) {
    let Some(cutoff) = cutoff else {
        return (posts, false);
    };
    match posts.iter().position(|post| post.created_at < cutoff) {
        Some(index) => {
            let mut posts = posts;
            posts.truncate(index);
            (posts, true)
        }
        None => (posts, false),
    }
}
