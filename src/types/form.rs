use std::collections::BTreeMap;
use std::fmt;

use super::bookmark::Bookmark;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Maximum number of tags on one bookmark.
pub const MAX_TAGS: usize = 5;

/// Raw text of the four editable fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Comma-separated tag list.
    pub tags_input: String,
}

impl FormFields {
    /// Pre-fills the fields from an existing bookmark for editing.
    pub fn from_bookmark(bookmark: &Bookmark) -> Self {
        Self {
            url: bookmark.url.clone(),
            title: bookmark.title.clone(),
            description: bookmark.description.clone(),
            tags_input: bookmark.tags.join(", "),
        }
    }
}

/// Identifies one editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Url,
    Title,
    Description,
    Tags,
}

impl FormField {
    /// Human-facing field label.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Url => "URL",
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Tags => "Tags",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Url => "url",
            FormField::Title => "title",
            FormField::Description => "description",
            FormField::Tags => "tags",
        };
        f.write_str(name)
    }
}

/// A single client-side validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidUrl,
    TooLong { max: usize },
    TooManyTags { max: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => write!(f, "is required"),
            FieldError::InvalidUrl => write!(f, "must be a valid URL (e.g. https://example.com)"),
            FieldError::TooLong { max } => write!(f, "must be at most {} characters", max),
            FieldError::TooManyTags { max } => write!(f, "maximum {} tags allowed", max),
        }
    }
}

impl FieldError {
    /// Full sentence shown under a field, e.g. "Title must be at most 200 characters."
    pub fn describe(&self, field: FormField) -> String {
        match self {
            FieldError::TooManyTags { max } => format!("Maximum {} tags allowed.", max),
            other => format!("{} {}.", field.label(), other),
        }
    }
}

/// The complete set of field-level errors from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<FormField, FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn get(&self, field: FormField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates errors in field order (url, title, description, tags).
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(&error.describe(field))?;
            first = false;
        }
        Ok(())
    }
}
