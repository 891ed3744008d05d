//! View State Controller for the bookmark list.
//!
//! Owns the single `ViewState` and changes it only through the transitions
//! below. Every change is published on a `watch` channel so a renderer can
//! follow along, including while a request is still in flight.
//!
//! - load (mount, retry, tag change, after any mutation): `Loading`, then
//!   `Ready` with the new list or `Failed` with a message. A wake-up notice is
//!   raised if the request is still running after `ViewTiming::wake_up_notice`.
//! - search input: debounced by `ViewTiming::search_debounce`, never touches
//!   the network.
//! - create/update: validated first; server errors stay inside the form.
//! - delete: server errors go to the page-level error state.
//!
//! Responses are applied in completion order; there is no request sequencing.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::managers::deadline::Deadline;
use crate::services::api_client::BookmarkApiTrait;
use crate::services::form_validator;
use crate::services::search_filter::{all_tags, filter_by_text};
use crate::types::bookmark::{Bookmark, BookmarkId};
use crate::types::errors::{ApiError, ViewError};
use crate::types::form::{FormErrors, FormFields};

/// How long a load may run before the wake-up notice is shown.
pub const WAKE_UP_NOTICE_DELAY: Duration = Duration::from_millis(2000);
/// Quiet period after the last keystroke before a search is applied.
pub const SEARCH_DEBOUNCE_DELAY: Duration = Duration::from_millis(200);

/// Timer durations used by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTiming {
    pub wake_up_notice: Duration,
    pub search_debounce: Duration,
}

impl Default for ViewTiming {
    fn default() -> Self {
        Self {
            wake_up_notice: WAKE_UP_NOTICE_DELAY,
            search_debounce: SEARCH_DEBOUNCE_DELAY,
        }
    }
}

/// Where the list load currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(BookmarkId),
}

/// The open create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkForm {
    pub mode: FormMode,
    pub fields: FormFields,
    /// Client-side errors from the last submit attempt.
    pub errors: FormErrors,
    /// Server error from the last submit attempt.
    pub api_error: Option<String>,
    pub submitting: bool,
}

impl BookmarkForm {
    fn new(mode: FormMode, fields: FormFields) -> Self {
        Self {
            mode,
            fields,
            errors: FormErrors::new(),
            api_error: None,
            submitting: false,
        }
    }
}

/// Why a successfully loaded view shows nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoMatches,
    NoTaggedBookmarks,
    NoBookmarks,
}

impl EmptyState {
    pub fn headline(&self) -> &'static str {
        match self {
            EmptyState::NoMatches => "No bookmarks match your search",
            EmptyState::NoTaggedBookmarks => "No bookmarks with this tag",
            EmptyState::NoBookmarks => "No bookmarks yet",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            EmptyState::NoMatches => "Try a different search term.",
            EmptyState::NoTaggedBookmarks | EmptyState::NoBookmarks => {
                "Add a bookmark to get started."
            }
        }
    }
}

/// Everything the list view renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub phase: LoadPhase,
    /// Last list received from the server, in server order.
    pub bookmarks: Vec<Bookmark>,
    /// Distinct tags of `bookmarks`, sorted; recomputed with every new list.
    pub tags: Vec<String>,
    pub active_tag: Option<String>,
    /// Search text as typed.
    pub search_input: String,
    /// Search text the visible list is filtered by (debounced).
    pub search: String,
    /// Page-level error message.
    pub error: Option<String>,
    pub wake_up_notice: bool,
    pub form: Option<BookmarkForm>,
}

impl ViewState {
    /// Bookmarks after the local text filter.
    pub fn visible(&self) -> Vec<&Bookmark> {
        filter_by_text(&self.bookmarks, &self.search)
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn find(&self, id: BookmarkId) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    /// Set only after a successful load leaves nothing visible.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.phase != LoadPhase::Ready || !self.visible().is_empty() {
            return None;
        }
        if !self.search.is_empty() {
            Some(EmptyState::NoMatches)
        } else if self.active_tag.is_some() {
            Some(EmptyState::NoTaggedBookmarks)
        } else {
            Some(EmptyState::NoBookmarks)
        }
    }

    /// e.g. `3 bookmarks matching "rust"`.
    pub fn summary(&self) -> String {
        let count = self.visible().len();
        let mut summary = format!("{} bookmark{}", count, if count == 1 { "" } else { "s" });
        if !self.search.is_empty() {
            summary.push_str(&format!(" matching \"{}\"", self.search));
        }
        summary
    }

    fn replace_bookmarks(&mut self, bookmarks: Vec<Bookmark>) {
        self.tags = all_tags(&bookmarks);
        self.bookmarks = bookmarks;
    }
}

/// Result of submitting the open form.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid(FormErrors),
    /// The server refused or failed; the form stays open with this message.
    Rejected(String),
    /// Saved; the form is closed and the list has been reloaded.
    Saved(Bookmark),
}

pub struct ViewController<A: BookmarkApiTrait> {
    api: A,
    timing: ViewTiming,
    state: ViewState,
    search_debounce: Deadline<String>,
    publisher: watch::Sender<ViewState>,
}

impl<A: BookmarkApiTrait> ViewController<A> {
    pub fn new(api: A) -> Self {
        Self::with_timing(api, ViewTiming::default())
    }

    pub fn with_timing(api: A, timing: ViewTiming) -> Self {
        let (publisher, _) = watch::channel(ViewState::default());
        Self {
            api,
            timing,
            state: ViewState::default(),
            search_debounce: Deadline::new(),
            publisher,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Receives a copy of the state after every transition.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.publisher.subscribe()
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }

    // ─── Loading ───

    /// Initial load.
    pub async fn mount(&mut self) -> Result<(), ApiError> {
        debug!("view mounted");
        self.refresh().await
    }

    /// User-triggered retry after a failed load.
    pub async fn retry(&mut self) -> Result<(), ApiError> {
        self.refresh().await
    }

    /// Reloads the list for the active tag.
    ///
    /// The outcome is also recorded in the state; the returned error is the
    /// same one shown on the page.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let tag = self.state.active_tag.clone();
        self.state.phase = LoadPhase::Loading;
        self.state.error = None;
        self.state.wake_up_notice = false;
        self.publish();
        info!(tag = ?tag, "loading bookmarks");

        let mut notice = Deadline::new();
        notice.schedule((), self.timing.wake_up_notice);
        let request = self.api.list(tag.as_deref());
        tokio::pin!(request);

        let outcome = loop {
            tokio::select! {
                result = &mut request => break result,
                () = notice.fired() => {
                    info!("load is slow, the server may be waking up");
                    self.state.wake_up_notice = true;
                    self.publish();
                }
            }
        };

        self.state.wake_up_notice = false;
        match outcome {
            Ok(bookmarks) => {
                info!(count = bookmarks.len(), "bookmarks loaded");
                self.state.replace_bookmarks(bookmarks);
                self.state.phase = LoadPhase::Ready;
                self.publish();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load bookmarks");
                self.state.error = Some(e.to_string());
                self.state.phase = LoadPhase::Failed;
                self.publish();
                Err(e)
            }
        }
    }

    // ─── Tag filter ───

    /// Sets the active tag and reloads. Re-selecting the current tag does nothing.
    pub async fn select_tag(&mut self, tag: Option<String>) -> Result<(), ApiError> {
        if tag == self.state.active_tag {
            return Ok(());
        }
        debug!(from = ?self.state.active_tag, to = ?tag, "active tag changed");
        self.state.active_tag = tag;
        self.refresh().await
    }

    /// Selects `tag`, or clears the filter when `tag` is already active.
    pub async fn toggle_tag(&mut self, tag: &str) -> Result<(), ApiError> {
        let next = match self.state.active_tag.as_deref() {
            Some(active) if active == tag => None,
            _ => Some(tag.to_string()),
        };
        self.select_tag(next).await
    }

    pub async fn clear_tag(&mut self) -> Result<(), ApiError> {
        self.select_tag(None).await
    }

    // ─── Search ───

    /// Records typed search text; it is applied once typing pauses.
    pub fn input_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search_debounce.schedule(text.clone(), self.timing.search_debounce);
        self.state.search_input = text;
        self.publish();
    }

    pub fn has_pending_search(&self) -> bool {
        self.search_debounce.is_pending()
    }

    /// Waits for the pending search to come due and applies it.
    ///
    /// Never resolves while no search is pending; safe to use in `select!`.
    pub async fn settle_search(&mut self) -> String {
        let query = self.search_debounce.fired().await;
        debug!(query = %query, "search applied");
        self.state.search = query.clone();
        self.publish();
        query
    }

    /// Clears the search immediately, dropping any pending input.
    pub fn clear_search(&mut self) {
        self.search_debounce.cancel();
        self.state.search_input.clear();
        self.state.search.clear();
        self.publish();
    }

    // ─── Form ───

    pub fn open_create_form(&mut self) {
        self.state.form = Some(BookmarkForm::new(FormMode::Create, FormFields::default()));
        self.publish();
    }

    /// Opens the edit form pre-filled from a bookmark in the current list.
    pub fn open_edit_form(&mut self, id: BookmarkId) -> Result<(), ViewError> {
        let bookmark = self.state.find(id).ok_or(ViewError::UnknownBookmark(id))?;
        let fields = FormFields::from_bookmark(bookmark);
        self.state.form = Some(BookmarkForm::new(FormMode::Edit(id), fields));
        self.publish();
        Ok(())
    }

    /// Applies an edit to the open form's fields.
    pub fn edit_form<F>(&mut self, edit: F) -> Result<(), ViewError>
    where
        F: FnOnce(&mut FormFields),
    {
        let form = self.state.form.as_mut().ok_or(ViewError::NoOpenForm)?;
        edit(&mut form.fields);
        self.publish();
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        if self.state.form.take().is_some() {
            self.publish();
        }
    }

    /// Validates and sends the open form.
    ///
    /// Nothing is sent unless every field passes. On success the form closes
    /// and the list is reloaded from the server.
    pub async fn submit_form(&mut self) -> Result<SubmitOutcome, ViewError> {
        let form = self.state.form.as_mut().ok_or(ViewError::NoOpenForm)?;
        let mode = form.mode;
        let input = match form_validator::validate(&form.fields) {
            Ok(input) => {
                form.errors = FormErrors::new();
                form.api_error = None;
                form.submitting = true;
                input
            }
            Err(errors) => {
                debug!(errors = %errors, "form rejected before submission");
                form.errors = errors.clone();
                self.publish();
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };
        self.publish();

        let result = match mode {
            FormMode::Create => self.api.create(&input).await,
            FormMode::Edit(id) => self.api.update(id, &input).await,
        };

        match result {
            Ok(saved) => {
                info!(id = %saved.id, "bookmark saved");
                self.state.form = None;
                self.publish();
                if let Err(e) = self.refresh().await {
                    debug!(error = %e, "reload after save failed");
                }
                Ok(SubmitOutcome::Saved(saved))
            }
            Err(e) => {
                warn!(error = %e, "server rejected bookmark");
                let message = e.to_string();
                if let Some(form) = self.state.form.as_mut() {
                    form.submitting = false;
                    form.api_error = Some(message.clone());
                }
                self.publish();
                Ok(SubmitOutcome::Rejected(message))
            }
        }
    }

    // ─── Delete ───

    /// Deletes a bookmark and reloads. Failures become the page-level error
    /// and leave the current list untouched.
    pub async fn delete(&mut self, id: BookmarkId) -> Result<(), ApiError> {
        match self.api.delete(id).await {
            Ok(()) => {
                info!(%id, "bookmark deleted");
                self.refresh().await
            }
            Err(e) => {
                warn!(%id, error = %e, "failed to delete bookmark");
                self.state.error = Some(e.to_string());
                self.state.phase = LoadPhase::Failed;
                self.publish();
                Err(e)
            }
        }
    }

    /// Cancels pending timers. Call when the view goes away.
    pub fn teardown(&mut self) {
        if self.search_debounce.cancel() {
            debug!("pending search cancelled on teardown");
        }
    }
}
