//! Paginated listing of the editor's own posts.
//!
//! Fetches are split into [`PaginatedListing::begin_fetch`],
//! [`FetchTicket::fetch`] and [`PaginatedListing::complete`], so a view can
//! keep accepting input while a request is outstanding. Each ticket carries
//! the generation it was issued for; completing a ticket from an older
//! generation is a no-op.

use tracing::{debug, warn};
use uuid::Uuid;

use penman_api_types::PostRecord;

use crate::domain::lifecycle::Confirmation;
use crate::domain::types::ListingFilter;

use super::error::AppError;
use super::ports::{ListRequest, PostApi, PostPage};
use super::posts::{DeleteOutcome, PostCommands};

pub(crate) const LISTING_STALE_DISCARDED_TOTAL: &str = "penman_listing_stale_discarded_total";

/// Maximum number of page numbers shown at once.
pub const WINDOW_SIZE: u32 = 5;

/// Page numbers to render for current page `current` of `total`.
///
/// `current` is clamped into `[1, total]` first. The result is empty when
/// `total` is zero.
pub fn window_pages(current: u32, total: u32) -> Vec<u32> {
    if total == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(WINDOW_SIZE / 2).max(1);
    let end = total.min(start.saturating_add(WINDOW_SIZE - 1));
    if end == total {
        start = end.saturating_sub(WINDOW_SIZE - 1).max(1);
    }

    (start..=end).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControl {
    pub target: u32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub current: bool,
}

/// Everything needed to draw the page controls under a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub previous: NavControl,
    pub next: NavControl,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    pub pages: Vec<PageLink>,
}

impl PaginationControls {
    /// `None` when there is at most one page: no controls are drawn.
    pub fn build(current: u32, total: u32) -> Option<Self> {
        if total <= 1 {
            return None;
        }

        let current = current.clamp(1, total);
        let window = window_pages(current, total);
        let first = window.first().copied().unwrap_or(1);
        let last = window.last().copied().unwrap_or(total);

        Some(Self {
            previous: NavControl {
                target: current.saturating_sub(1).max(1),
                enabled: current > 1,
            },
            next: NavControl {
                target: current.saturating_add(1).min(total),
                enabled: current < total,
            },
            leading_ellipsis: first > 1,
            trailing_ellipsis: last < total,
            pages: window
                .into_iter()
                .map(|number| PageLink {
                    number,
                    current: number == current,
                })
                .collect(),
        })
    }
}

/// Filter and position of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingQuery {
    filter: ListingFilter,
    page: u32,
    page_size: u32,
    total_pages: u32,
}

impl ListingQuery {
    pub fn new(filter: ListingFilter, page_size: u32) -> Self {
        Self {
            filter,
            page: 1,
            page_size: page_size.max(1),
            total_pages: 0,
        }
    }

    pub fn filter(&self) -> ListingFilter {
        self.filter
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Switching the filter always starts over at page one.
    pub fn set_filter(&mut self, filter: ListingFilter) {
        self.filter = filter;
        self.page = 1;
        self.total_pages = 0;
    }

    /// Move to `page`, kept inside the known page range. The filter is
    /// untouched.
    pub fn set_page(&mut self, page: u32) {
        self.page = if self.total_pages >= 1 {
            page.clamp(1, self.total_pages)
        } else {
            page.max(1)
        };
    }

    pub fn request(&self) -> ListRequest {
        ListRequest {
            filter: self.filter,
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Take the position the server reports. Returns `false` when the
    /// reported page lies past the last page and had to be pulled back.
    fn record_position(&mut self, current_page: u32, total_pages: u32) -> bool {
        self.total_pages = total_pages;
        let current_page = current_page.max(1);
        if total_pages >= 1 && current_page > total_pages {
            self.page = total_pages;
            return false;
        }
        self.page = current_page;
        true
    }
}

/// A fetch issued by [`PaginatedListing::begin_fetch`].
pub struct FetchTicket<A: ?Sized> {
    generation: u64,
    request: ListRequest,
    commands: PostCommands<A>,
}

impl<A> FetchTicket<A>
where
    A: PostApi + ?Sized,
{
    pub fn request(&self) -> ListRequest {
        self.request
    }

    pub async fn fetch(self) -> FetchOutcome {
        let result = self.commands.list(self.request).await;
        FetchOutcome {
            generation: self.generation,
            request: self.request,
            result,
        }
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    generation: u64,
    request: ListRequest,
    result: Result<PostPage, AppError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer fetch was issued meanwhile; the outcome was dropped.
    Stale,
    /// The requested page is past the end. Totals were applied and the
    /// position moved to the last page, but the items belong to the old
    /// position; fetch again to fill them.
    OutOfRange,
}

pub struct PaginatedListing<A: ?Sized> {
    commands: PostCommands<A>,
    query: ListingQuery,
    generation: u64,
    items: Vec<PostRecord>,
    total_items: u64,
    loading: bool,
    error: Option<String>,
}

impl<A> PaginatedListing<A>
where
    A: PostApi + ?Sized,
{
    pub fn new(commands: PostCommands<A>, filter: ListingFilter, page_size: u32) -> Self {
        Self {
            commands,
            query: ListingQuery::new(filter, page_size),
            generation: 0,
            items: Vec::new(),
            total_items: 0,
            loading: false,
            error: None,
        }
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn items(&self) -> &[PostRecord] {
        &self.items
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        self.query.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn controls(&self) -> Option<PaginationControls> {
        PaginationControls::build(self.query.page, self.query.total_pages)
    }

    /// Start a fetch for the current query. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket<A> {
        self.generation = self.generation.wrapping_add(1);
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            request: self.query.request(),
            commands: self.commands.clone(),
        }
    }

    /// Switch filter (back to page one) and start fetching it.
    pub fn begin_filter(&mut self, filter: ListingFilter) -> FetchTicket<A> {
        self.query.set_filter(filter);
        self.begin_fetch()
    }

    pub fn begin_page(&mut self, page: u32) -> FetchTicket<A> {
        self.query.set_page(page);
        self.begin_fetch()
    }

    /// Apply a fetch outcome if it belongs to the latest ticket.
    pub fn complete(&mut self, outcome: FetchOutcome) -> Result<Applied, AppError> {
        if outcome.generation != self.generation {
            metrics::counter!(LISTING_STALE_DISCARDED_TOTAL).increment(1);
            debug!(
                generation = outcome.generation,
                latest = self.generation,
                filter = %outcome.request.filter,
                page = outcome.request.page,
                "discarding superseded listing result"
            );
            return Ok(Applied::Stale);
        }

        self.loading = false;
        match outcome.result {
            Ok(page) => {
                self.items = page.items;
                self.total_items = page.total_items;
                self.error = None;
                if self
                    .query
                    .record_position(page.current_page, page.total_pages)
                {
                    Ok(Applied::Current)
                } else {
                    debug!(
                        requested = outcome.request.page,
                        total_pages = page.total_pages,
                        "listing page past the end, moved to the last page"
                    );
                    Ok(Applied::OutOfRange)
                }
            }
            Err(err) => {
                self.error = Some(err.notice());
                Err(err)
            }
        }
    }

    /// Fetch the current query and apply it.
    ///
    /// When the requested page no longer exists (the last item of the last
    /// page was deleted, say) the listing steps back to the last page.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let outcome = self.begin_fetch().fetch().await;
        if self.complete(outcome)? == Applied::OutOfRange {
            let outcome = self.begin_fetch().fetch().await;
            self.complete(outcome)?;
        }
        Ok(())
    }

    pub async fn select_filter(&mut self, filter: ListingFilter) -> Result<(), AppError> {
        self.query.set_filter(filter);
        self.refresh().await
    }

    pub async fn select_page(&mut self, page: u32) -> Result<(), AppError> {
        self.query.set_page(page);
        self.refresh().await
    }

    /// Flip the publish flag of a listed post, then reload the page.
    pub async fn toggle_published(&mut self, id: Uuid) -> Result<(), AppError> {
        let published = match self.items.iter().find(|item| item.id == id) {
            Some(item) => item.published,
            None => self.commands.get(id).await?.published,
        };

        if let Err(err) = self.commands.set_published(id, !published).await {
            self.error = Some(err.notice());
            return Err(err);
        }
        self.refresh().await
    }

    pub async fn delete(
        &mut self,
        id: Uuid,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, AppError> {
        let outcome = match self.commands.delete(id, confirmation).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(post_id = %id, error = %err, "delete from listing failed");
                self.error = Some(err.notice());
                return Err(err);
            }
        };

        if outcome == DeleteOutcome::Deleted {
            self.refresh().await?;
        }
        Ok(outcome)
    }
}
