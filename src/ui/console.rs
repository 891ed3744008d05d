//! Console rendering of the bookmark view.
//!
//! Pure formatting: every function takes state and returns text. Colors come
//! from the active theme palette and are skipped when output is not a terminal.

use chrono::DateTime;
use owo_colors::{AnsiColors, OwoColorize};

use crate::managers::view_controller::{BookmarkForm, FormMode, LoadPhase, ViewState};
use crate::services::theme_engine::Palette;
use crate::types::bookmark::Bookmark;

pub const WAKE_UP_HEADLINE: &str = "Waking up the server...";
pub const WAKE_UP_DETAIL: &str =
    "The backend may be on a free hosting instance. This might take up to 60 seconds. Hang tight!";

/// Renders a `created_at` timestamp as e.g. "Mar 4, 2025"; unparseable values are kept verbatim.
pub fn format_date(created_at: &str) -> String {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => created_at.to_string(),
    }
}

/// Text of the delete confirmation question.
pub fn delete_prompt(bookmark: &Bookmark) -> String {
    format!("Delete \"{}\"? This action cannot be undone.", bookmark.title)
}

pub struct ConsoleRenderer {
    palette: Palette,
    styled: bool,
}

impl ConsoleRenderer {
    pub fn new(palette: Palette, styled: bool) -> Self {
        Self { palette, styled }
    }

    fn paint(&self, text: &str, color: AnsiColors) -> String {
        if self.styled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn wake_up_notice(&self) -> String {
        format!(
            "{}\n  {}",
            self.paint(WAKE_UP_HEADLINE, self.palette.notice),
            WAKE_UP_DETAIL
        )
    }

    pub fn error(&self, message: &str) -> String {
        self.paint(&format!("Error: {}", message), self.palette.error)
    }

    /// One bookmark card.
    pub fn bookmark(&self, bookmark: &Bookmark, active_tag: Option<&str>) -> String {
        let mut out = format!(
            "[{}] {}\n    {}",
            bookmark.id,
            self.paint(&bookmark.title, self.palette.title),
            self.paint(&bookmark.url, self.palette.link)
        );
        if !bookmark.description.is_empty() {
            out.push_str(&format!("\n    {}", bookmark.description));
        }
        let mut footer = Vec::new();
        for tag in &bookmark.tags {
            let color = if active_tag == Some(tag.as_str()) {
                self.palette.active_tag
            } else {
                self.palette.tag
            };
            footer.push(self.paint(&format!("#{}", tag), color));
        }
        footer.push(self.paint(&format_date(&bookmark.created_at), self.palette.muted));
        out.push_str(&format!("\n    {}", footer.join(" ")));
        out
    }

    /// Tag chips line, with the active tag highlighted.
    pub fn tag_filter(&self, tags: &[String], active_tag: Option<&str>) -> String {
        let chips: Vec<String> = tags
            .iter()
            .map(|tag| {
                if active_tag == Some(tag.as_str()) {
                    self.paint(&format!("[#{}]", tag), self.palette.active_tag)
                } else {
                    self.paint(&format!("#{}", tag), self.palette.tag)
                }
            })
            .collect();
        format!("Filter by tag: {}", chips.join(" "))
    }

    /// The full list view.
    pub fn view(&self, state: &ViewState) -> String {
        let mut lines = Vec::new();

        if !state.tags.is_empty() {
            lines.push(self.tag_filter(&state.tags, state.active_tag.as_deref()));
        }
        if let Some(tag) = &state.active_tag {
            lines.push(format!("Filtering by: #{}", tag));
        }
        if let Some(error) = &state.error {
            lines.push(format!("{} (type 'retry' to try again)", self.error(error)));
        }
        if state.wake_up_notice && state.is_loading() {
            lines.push(self.wake_up_notice());
        }

        match state.phase {
            LoadPhase::Idle | LoadPhase::Loading => {
                lines.push(self.paint("Loading bookmarks...", self.palette.muted));
            }
            LoadPhase::Ready | LoadPhase::Failed => {
                if let Some(empty) = state.empty_state() {
                    lines.push(empty.headline().to_string());
                    lines.push(self.paint(empty.hint(), self.palette.muted));
                } else if state.phase == LoadPhase::Ready || !state.bookmarks.is_empty() {
                    lines.push(self.paint(&state.summary(), self.palette.muted));
                    let active = state.active_tag.as_deref();
                    for bookmark in state.visible() {
                        lines.push(self.bookmark(bookmark, active));
                    }
                }
            }
        }
        lines.join("\n")
    }

    /// Form header, server error and per-field errors.
    pub fn form_status(&self, form: &BookmarkForm) -> String {
        let mut lines = vec![match form.mode {
            FormMode::Create => "Add New Bookmark".to_string(),
            FormMode::Edit(id) => format!("Edit Bookmark {}", id),
        }];
        if let Some(api_error) = &form.api_error {
            lines.push(self.error(api_error));
        }
        for (field, error) in form.errors.iter() {
            lines.push(self.paint(&format!("  {}", error.describe(field)), self.palette.error));
        }
        lines.join("\n")
    }
}
