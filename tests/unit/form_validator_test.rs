//! Form validation rules exercised through the public validator API.

use bookmark_manager::services::form_validator::{check, parse_tags, validate};
use bookmark_manager::types::form::{FieldError, FormField, FormFields};
use rstest::rstest;

fn fields(url: &str, title: &str, description: &str, tags: &str) -> FormFields {
    FormFields {
        url: url.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        tags_input: tags.to_string(),
    }
}

#[rstest]
#[case::empty_url(fields("", "Rust", "", ""), FormField::Url, FieldError::Required)]
#[case::whitespace_url(fields("   ", "Rust", "", ""), FormField::Url, FieldError::Required)]
#[case::not_a_url(fields("not-a-url", "Rust", "", ""), FormField::Url, FieldError::InvalidUrl)]
#[case::empty_title(fields("https://a.com", " ", "", ""), FormField::Title, FieldError::Required)]
#[case::long_title(
    fields("https://a.com", &"t".repeat(201), "", ""),
    FormField::Title,
    FieldError::TooLong { max: 200 }
)]
#[case::long_description(
    fields("https://a.com", "A", &"d".repeat(501), ""),
    FormField::Description,
    FieldError::TooLong { max: 500 }
)]
#[case::six_tags(
    fields("https://a.com", "A", "", "a,b,c,d,e,f"),
    FormField::Tags,
    FieldError::TooManyTags { max: 5 }
)]
fn single_field_failures(
    #[case] input: FormFields,
    #[case] field: FormField,
    #[case] expected: FieldError,
) {
    let errors = validate(&input).unwrap_err();
    assert_eq!(errors.len(), 1, "unexpected errors: {}", errors);
    assert_eq!(errors.get(field), Some(&expected));
}

#[test]
fn limits_are_inclusive() {
    let input = fields(
        "https://a.com",
        &"t".repeat(200),
        &"d".repeat(500),
        "a, b, c, d, e",
    );
    assert!(check(&input).is_empty());
}

#[test]
fn limits_count_characters_not_bytes() {
    let input = fields("https://a.com", &"é".repeat(200), "", "");
    assert!(validate(&input).is_ok());
}

#[test]
fn every_failing_field_is_reported() {
    let errors = check(&fields("", "", &"d".repeat(501), "1,2,3,4,5,6"));
    assert_eq!(errors.len(), 4);
    assert_eq!(
        errors.to_string(),
        "URL is required. Title is required. \
         Description must be at most 500 characters. Maximum 5 tags allowed."
    );
}

#[test]
fn valid_input_is_trimmed_and_tags_parsed() {
    let input = validate(&fields(" https://a.com ", "  Rust ", " notes ", "a, b, c")).unwrap();
    assert_eq!(input.url, "https://a.com");
    assert_eq!(input.title, "Rust");
    assert_eq!(input.description, "notes");
    assert_eq!(input.tags, vec!["a", "b", "c"]);
}

#[rstest]
#[case("", &[])]
#[case(" , ,", &[])]
#[case("Rust, WEB ,rust", &["rust", "web", "rust"])]
#[case("one", &["one"])]
fn tag_parsing(#[case] raw: &str, #[case] expected: &[&str]) {
    assert_eq!(parse_tags(raw), expected);
}

#[test]
fn empty_entries_do_not_count_toward_the_limit() {
    assert!(check(&fields("https://a.com", "A", "", "a,,b,,c,,d,,e,,")).is_empty());
}
