//! Form Validator: pure checks run on the editable fields before every submission.
//!
//! Validation never short-circuits: every field is checked so all messages can
//! be shown at once. A `BookmarkInput` is only produced when no field failed.

use reqwest::Url;

use crate::types::bookmark::BookmarkInput;
use crate::types::form::{
    FieldError, FormErrors, FormField, FormFields, DESCRIPTION_MAX_CHARS, MAX_TAGS,
    TITLE_MAX_CHARS,
};

/// Splits a comma-separated tag string, trimming and lowercasing each entry
/// and dropping empties. Duplicates are kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// True when `value` parses as an absolute URL.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Runs every field rule and returns the full error set (empty when valid).
pub fn check(fields: &FormFields) -> FormErrors {
    let mut errors = FormErrors::new();

    let url = fields.url.trim();
    if url.is_empty() {
        errors.insert(FormField::Url, FieldError::Required);
    } else if !is_valid_url(url) {
        errors.insert(FormField::Url, FieldError::InvalidUrl);
    }

    let title = fields.title.trim();
    if title.is_empty() {
        errors.insert(FormField::Title, FieldError::Required);
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.insert(FormField::Title, FieldError::TooLong { max: TITLE_MAX_CHARS });
    }

    if fields.description.trim().chars().count() > DESCRIPTION_MAX_CHARS {
        errors.insert(
            FormField::Description,
            FieldError::TooLong { max: DESCRIPTION_MAX_CHARS },
        );
    }

    if parse_tags(&fields.tags_input).len() > MAX_TAGS {
        errors.insert(FormField::Tags, FieldError::TooManyTags { max: MAX_TAGS });
    }

    errors
}

/// Validates the fields and, if they pass, builds the trimmed submission payload.
pub fn validate(fields: &FormFields) -> Result<BookmarkInput, FormErrors> {
    let errors = check(fields);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(BookmarkInput {
        url: fields.url.trim().to_string(),
        title: fields.title.trim().to_string(),
        description: fields.description.trim().to_string(),
        tags: parse_tags(&fields.tags_input),
    })
}
