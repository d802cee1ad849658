//! URL slugs for events.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and single hyphens.

use std::fmt;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Base used when a title has no sluggable characters.
const FALLBACK_SLUG: &str = "event";
/// Longest derived base; leaves room for a `-N` suffix within 255 columns.
const SLUG_BASE_MAX: usize = 240;

/// Raised when a stored or supplied slug is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid slug: {value}")]
pub struct InvalidSlug {
    value: String,
}

/// Validated event slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Validate an existing slug.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidSlug> {
        let value = value.into();
        if is_valid_slug(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidSlug { value })
        }
    }

    /// Derive a slug from free text.
    ///
    /// Accents are folded, every run of other characters becomes a single
    /// hyphen, and leading or trailing hyphens are dropped.
    ///
    /// # Examples
    /// ```
    /// use ticketing::domain::Slug;
    ///
    /// assert_eq!(Slug::from_title("  Festa Junina São João! ").as_ref(), "festa-junina-sao-joao");
    /// assert_eq!(Slug::from_title("!!!").as_ref(), "event");
    /// ```
    pub fn from_title(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len());
        let mut pending_dash = false;
        for ch in title.trim().to_lowercase().nfd() {
            if is_combining_mark(ch) {
                continue;
            }
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ch);
            } else {
                pending_dash = true;
            }
        }
        // Only ASCII was pushed, so every byte index is a char boundary.
        slug.truncate(SLUG_BASE_MAX);
        while slug.ends_with('-') {
            slug.pop();
        }
        if slug.is_empty() {
            slug.push_str(FALLBACK_SLUG);
        }
        Self(slug)
    }

    /// The `n`th candidate for this base, e.g. `summer-fest-2`.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return `true` when `value` is a valid slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}
