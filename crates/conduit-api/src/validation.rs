//! Field validation rules.
//!
//! Messages use the binding-tag format clients already parse:
//! `{key: required}`, `{key: email}`, `{min: 8}` and so on. Only the first
//! failing rule per field is reported. Apart from `Required`, rules skip
//! empty values.

use std::sync::LazyLock;

use conduit_core::errors::ValidationError;
use regex::Regex;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").ok());

static URL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+[^\s]*$").ok());

fn regex_matches(re: &LazyLock<Option<Regex>>, value: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    /// ASCII letters and digits only.
    Alphanum,
    Url,
    /// Minimum length in characters.
    Min(usize),
    /// Maximum length in characters.
    Max(usize),
}

impl Rule {
    pub fn check(&self, value: &str) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::Email => regex_matches(&EMAIL_RE, value),
            Self::Alphanum => value.chars().all(|c| c.is_ascii_alphanumeric()),
            Self::Url => regex_matches(&URL_RE, value),
            Self::Min(n) => value.chars().count() >= *n,
            Self::Max(n) => value.chars().count() <= *n,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Required => "{key: required}".to_string(),
            Self::Email => "{key: email}".to_string(),
            Self::Alphanum => "{key: alphanum}".to_string(),
            Self::Url => "{key: url}".to_string(),
            Self::Min(n) => format!("{{min: {n}}}"),
            Self::Max(n) => format!("{{max: {n}}}"),
        }
    }
}

/// Apply `rules` to `value`, recording the first failure under `field`.
pub fn check_field(errors: &mut ValidationError, field: &str, value: &str, rules: &[Rule]) {
    if value.is_empty() {
        if rules.contains(&Rule::Required) {
            errors.add(field, Rule::Required.message());
        }
        return;
    }
    if let Some(rule) = rules.iter().find(|rule| !rule.check(value)) {
        errors.add(field, rule.message());
    }
}

/// Like [`check_field`], for fields that may be absent. An absent field is
/// never an error; a present one gets the full rule set.
pub fn check_optional(
    errors: &mut ValidationError,
    field: &str,
    value: Option<&str>,
    rules: &[Rule],
) {
    if let Some(value) = value {
        check_field(errors, field, value, rules);
    }
}

pub const USERNAME_RULES: &[Rule] = &[Rule::Required, Rule::Alphanum, Rule::Min(4), Rule::Max(255)];
pub const EMAIL_RULES: &[Rule] = &[Rule::Required, Rule::Email];
pub const PASSWORD_RULES: &[Rule] = &[Rule::Required, Rule::Min(8), Rule::Max(255)];
pub const IMAGE_RULES: &[Rule] = &[Rule::Url];
pub const BIO_RULES: &[Rule] = &[Rule::Max(1024)];
pub const TITLE_RULES: &[Rule] = &[Rule::Required, Rule::Min(4)];
pub const TEXT_RULES: &[Rule] = &[Rule::Max(2048)];
pub const COMMENT_RULES: &[Rule] = &[Rule::Required, Rule::Max(2048)];
