use tracing::{debug, info, warn};

use crate::cache::DigestCache;
use crate::dates::{DateCursor, DigestDate};
use crate::digest::{Article, Digest};
use crate::error::FetchError;
use crate::fetcher::DigestClient;
use crate::tabs::TabController;

/// Token for one in-flight digest fetch, handed out by
/// [`ReaderSession::begin_digest_load`]. The generation inside it pins the
/// session state the fetch was started from; a result applied under a newer
/// generation is discarded.
#[derive(Debug)]
pub struct DigestRequest {
    date: DigestDate,
    generation: u64,
}

impl DigestRequest {
    pub fn date(&self) -> &DigestDate {
        &self.date
    }
}

/// Canonical state container for one reader session.
///
/// Owns the date cursor, the per-session digest cache, the tab state and the
/// HTTP client, and is only updated through its operations. Rendering reads
/// the projection accessors; every fetch failure lands here as a displayable
/// message, never as a propagated error.
pub struct ReaderSession {
    client: DigestClient,
    cursor: DateCursor,
    cache: DigestCache,
    tabs: TabController,
    digest: Option<Digest>,
    dates_loaded: bool,
    dates_error: Option<String>,
    digest_error: Option<String>,
    digest_loading: bool,
    generation: u64,
}

impl ReaderSession {
    pub fn new(client: DigestClient) -> Self {
        Self {
            client,
            cursor: DateCursor::new(),
            cache: DigestCache::new(),
            tabs: TabController::new(),
            digest: None,
            dates_loaded: false,
            dates_error: None,
            digest_error: None,
            digest_loading: false,
            generation: 0,
        }
    }

    /// Loads the available dates and, when any exist, the digest for the
    /// most recent one.
    pub async fn start(&mut self) {
        self.load_available_dates().await;
        if self.cursor.current().is_some() {
            self.load_current_digest().await;
        }
    }

    /// Fetches the date list and rebuilds the cursor, selecting the latest
    /// date. On failure only the dates error message changes; the cursor,
    /// cache and digest view keep their previous state so a retry can pick
    /// up where the session left off.
    pub async fn load_available_dates(&mut self) {
        match self.client.available_dates().await {
            Ok(dates) => {
                info!("Loaded {} available dates", dates.len());
                self.cursor = DateCursor::from_dates(dates);
                self.dates_loaded = true;
                self.dates_error = None;
                if self.cursor.is_empty() {
                    self.digest = None;
                    self.digest_error = None;
                    self.digest_loading = false;
                    self.tabs.clear();
                }
            }
            Err(e) => {
                warn!("Failed to load available dates: {}", e);
                self.dates_error = Some(display_message(&e, "available dates"));
            }
        }
    }

    /// Steps to the previous (older) date and loads its digest. Returns
    /// false without side effects when already at the oldest date.
    pub async fn go_to_previous(&mut self) -> bool {
        if !self.cursor.go_to_previous() {
            return false;
        }
        self.load_current_digest().await;
        true
    }

    /// Steps to the next (newer) date and loads its digest. Returns false
    /// without side effects when already at the latest date.
    pub async fn go_to_next(&mut self) -> bool {
        if !self.cursor.go_to_next() {
            return false;
        }
        self.load_current_digest().await;
        true
    }

    /// Retries whichever load last failed: the date list if it never
    /// succeeded (or came back empty), otherwise the current date's digest.
    pub async fn reload(&mut self) {
        if !self.dates_loaded || self.dates_error.is_some() || self.cursor.is_empty() {
            self.start().await;
        } else {
            self.load_current_digest().await;
        }
    }

    /// Loads the digest for the current date, cache-first.
    pub async fn load_current_digest(&mut self) {
        let Some(request) = self.begin_digest_load() else {
            return;
        };
        let result = self.client.daily_digest(request.date()).await;
        self.apply_digest_result(request, result);
    }

    /// First half of the split fetch API. Bumps the generation (so any
    /// earlier in-flight request becomes stale), then either serves the
    /// current date from cache (returning None) or marks the session
    /// loading and hands back the request to fetch.
    ///
    /// Returns None when there is no current date to load.
    pub fn begin_digest_load(&mut self) -> Option<DigestRequest> {
        let date = self.cursor.current()?.clone();
        self.generation = self.generation.wrapping_add(1);

        if let Some(found) = self.cache.get(&date).cloned() {
            debug!("Digest for {} served from cache", date);
            self.digest_loading = false;
            self.digest_error = None;
            self.show_digest(found);
            return None;
        }

        self.digest_loading = true;
        Some(DigestRequest {
            date,
            generation: self.generation,
        })
    }

    /// Second half of the split fetch API. Returns false when the request's
    /// generation is no longer current, in which case the result is dropped
    /// entirely; a stale fetch can never overwrite state for a newer date.
    pub fn apply_digest_result(
        &mut self,
        request: DigestRequest,
        result: Result<Digest, FetchError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!("Discarding stale digest response for {}", request.date);
            return false;
        }

        self.digest_loading = false;
        match result {
            Ok(digest) => {
                self.cache.insert(request.date, digest.clone());
                self.digest_error = None;
                self.show_digest(digest);
            }
            Err(e) => {
                warn!("Failed to load digest for {}: {}", request.date, e);
                self.digest_error = Some(display_message(&e, "digest"));
            }
        }
        true
    }

    /// Activates a category tab. No-op (returning false) for unknown or
    /// already-active codes.
    pub fn change_tab(&mut self, code: &str) -> bool {
        self.tabs.change_tab(code)
    }

    fn show_digest(&mut self, digest: Digest) {
        self.tabs.sync(&digest);
        self.digest = Some(digest);
    }

    // --- projection accessors ---

    pub fn current_date(&self) -> Option<&DigestDate> {
        self.cursor.current()
    }

    pub fn available_dates(&self) -> &[DigestDate] {
        self.cursor.dates()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.cursor.has_next()
    }

    pub fn digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }

    pub fn categories(&self) -> &[String] {
        self.tabs.categories()
    }

    pub fn active_category(&self) -> Option<&str> {
        self.tabs.active()
    }

    /// Articles for the active category, merged across buckets.
    pub fn active_articles(&self) -> Vec<&Article> {
        match (self.digest.as_ref(), self.tabs.active()) {
            (Some(digest), Some(code)) => digest.articles_for(code),
            _ => Vec::new(),
        }
    }

    /// Tab transition direction for the most recent tab change.
    pub fn direction(&self) -> i8 {
        self.tabs.direction()
    }

    pub fn is_loading(&self) -> bool {
        self.digest_loading
    }

    pub fn dates_error(&self) -> Option<&str> {
        self.dates_error.as_deref()
    }

    pub fn digest_error(&self) -> Option<&str> {
        self.digest_error.as_deref()
    }

    /// True once the date list has loaded and turned out empty. Distinct
    /// from a dates load failure.
    pub fn no_dates(&self) -> bool {
        self.dates_loaded && self.cursor.is_empty()
    }

    pub fn dates_loaded(&self) -> bool {
        self.dates_loaded
    }
}

/// Maps a fetch error onto the message shown to the reader.
fn display_message(error: &FetchError, what: &str) -> String {
    match error {
        FetchError::Timeout => {
            "Request timed out. The server may be busy, please try again.".to_string()
        }
        FetchError::Network(_) => {
            "Network error. Please check your connection and try again.".to_string()
        }
        FetchError::Upstream { message, .. } => format!("Failed to load {what}: {message}"),
        FetchError::Validation(message) | FetchError::Unexpected(message) => {
            format!("Failed to load {what}: {message}")
        }
    }
}
