//! String stages for `Pipeline<String>`.
//!
//! Plain functions are stages as-is; the constructors return closures that
//! capture their arguments. Everything here is `Send + Sync + 'static` so it
//! can be handed straight to `PipelineBuilder::add`.

use std::sync::LazyLock;

use kiln_types::{Pipeline, PipelineBuilder};
use regex::Regex;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Maximum length of a slug produced by [`slug_pipeline`].
pub const SLUG_MAX_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub fn trim(s: String) -> String {
    let trimmed = s.trim();
    if trimmed.len() == s.len() {
        s
    } else {
        trimmed.to_string()
    }
}

pub fn lowercase(s: String) -> String {
    s.to_lowercase()
}

pub fn uppercase(s: String) -> String {
    s.to_uppercase()
}

/// Replace every run of whitespace with `replacement`.
pub fn collapse_whitespace(
    replacement: impl Into<String>,
) -> impl Fn(String) -> String + Send + Sync + 'static {
    let replacement = replacement.into();
    move |s: String| {
        WHITESPACE_RUN
            .replace_all(&s, regex::NoExpand(&replacement))
            .into_owned()
    }
}

/// Keep at most `max` user-perceived characters (extended grapheme clusters).
pub fn truncate(max: usize) -> impl Fn(String) -> String + Send + Sync + 'static {
    move |s: String| {
        let cut = s.grapheme_indices(true).nth(max).map(|(index, _)| index);
        match cut {
            Some(cut) => s[..cut].to_string(),
            None => s,
        }
    }
}

pub fn prefix(value: impl Into<String>) -> impl Fn(String) -> String + Send + Sync + 'static {
    let value = value.into();
    move |s: String| format!("{value}{s}")
}

pub fn suffix(value: impl Into<String>) -> impl Fn(String) -> String + Send + Sync + 'static {
    let value = value.into();
    move |s: String| s + &value
}

/// Replace every match of `pattern` with `with`.
///
/// `with` may reference capture groups (`$1`, `${name}`).
pub fn replace(
    pattern: &str,
    with: impl Into<String>,
) -> Result<impl Fn(String) -> String + Send + Sync + 'static, TextError> {
    let regex = Regex::new(pattern).map_err(|source| TextError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let with = with.into();
    Ok(move |s: String| regex.replace_all(&s, with.as_str()).into_owned())
}

/// `trim → lowercase → whitespace to "_" → first 20 characters`.
pub fn slug_pipeline() -> Pipeline<String> {
    PipelineBuilder::new()
        .add_named("trim", trim)
        .add_named("lowercase", lowercase)
        .add_named("collapse_whitespace", collapse_whitespace("_"))
        .add_named("truncate", truncate(SLUG_MAX_LEN))
        .build()
}
