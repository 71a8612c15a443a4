//! Field validation for screen forms.
//!
//! Validators follow the usual reactive-forms rules: only `Required` rejects
//! an empty value, every other validator lets it through. Lengths count
//! characters, not bytes.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is valid")
    })
}

fn is_email(value: &str) -> bool {
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    value.len() <= EMAIL_MAX_LEN
        && local.len() <= EMAIL_LOCAL_MAX_LEN
        && email_pattern().is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Enter a valid email address")]
    Email,
    #[error("Must be at least {required} characters")]
    MinLength { required: usize, actual: usize },
    #[error("Must be at most {allowed} characters")]
    MaxLength { allowed: usize, actual: usize },
}

impl Validator {
    pub fn check(&self, value: &str) -> Option<ValidationError> {
        let length = value.chars().count();
        match *self {
            Validator::Required if value.is_empty() => Some(ValidationError::Required),
            Validator::Required => None,
            _ if value.is_empty() => None,
            Validator::Email if !is_email(value) => Some(ValidationError::Email),
            Validator::Email => None,
            Validator::MinLength(required) if length < required => Some(ValidationError::MinLength {
                required,
                actual: length,
            }),
            Validator::MaxLength(allowed) if length > allowed => Some(ValidationError::MaxLength {
                allowed,
                actual: length,
            }),
            Validator::MinLength(_) | Validator::MaxLength(_) => None,
        }
    }
}

/// A single form field with its validators
#[derive(Debug, Clone)]
pub struct FormControl {
    value: String,
    validators: Vec<Validator>,
}

impl FormControl {
    pub fn new(validators: &[Validator]) -> Self {
        Self {
            value: String::new(),
            validators: validators.to_vec(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.validators
            .iter()
            .filter_map(|validator| validator.check(&self.value))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.validators
            .iter()
            .all(|validator| validator.check(&self.value).is_none())
    }
}
