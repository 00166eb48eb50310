//! Shared form plumbing: field errors, attachments, submission state.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Loose email shape check: something@something.something.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Field-level validation errors, keyed by field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct FieldErrors<F: Ord + core::fmt::Debug> {
    errors: BTreeMap<F, &'static str>,
}

impl<F: Ord + Copy + core::fmt::Debug> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: Ord + Copy + core::fmt::Debug> FieldErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`; the first error recorded for a field wins.
    pub fn add(&mut self, field: F, message: &'static str) {
        self.errors.entry(field).or_insert(message);
    }

    pub fn clear(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: F) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &'static str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, *m))
    }

    /// `Ok(value)` when no errors were recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// A select value that is not one of the offered options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownChoice {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A file picked in a form (photo, resume).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Contact-form lifecycle: fill in, submit, then optionally start over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Editing,
    Submitted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("ab.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a @b.com"));
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add(1u8, "required");
        errors.add(1u8, "too short");
        errors.add(2u8, "invalid");
        assert_eq!(errors.get(1), Some("required"));
        assert_eq!(errors.len(), 2);

        errors.clear(1);
        assert_eq!(errors.get(1), None);
        assert_eq!(errors.into_result(|| ()).unwrap_err().len(), 1);
    }

    #[test]
    fn empty_errors_yield_value() {
        let errors: FieldErrors<u8> = FieldErrors::new();
        assert_eq!(errors.into_result(|| 5), Ok(5));
    }

    #[test]
    fn unknown_choice_names_kind_and_value() {
        let err = UnknownChoice::new("issue type", "broken");
        assert_eq!(err.to_string(), "unknown issue type \"broken\"");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

            /// Property: any whitespace-free local@domain.tld shape is accepted.
            #[test]
            fn well_formed_addresses_pass(
                local in "[a-z0-9._+]{1,12}",
                domain in "[a-z0-9-]{1,12}",
                tld in "[a-z]{2,6}",
            ) {
                let email = format!("{local}@{domain}.{tld}");
                prop_assert!(is_valid_email(&email));
            }

            /// Property: input without an '@' is never an email.
            #[test]
            fn missing_at_sign_fails(s in "[^@]{0,32}") {
                prop_assert!(!is_valid_email(&s));
            }
        }
    }
}
