//! HTML fragments and the text sanitising applied around them.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// A `<` followed by whitespace is text, not a tag.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^\s>][^>]*>?").expect("valid regex"));
static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("valid regex"));

/// An owned HTML fragment. Empty markup means "render nothing at all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub(crate) fn push_raw(&mut self, html: &str) {
        self.0.push_str(html);
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.0.push_str(&escape_html(text));
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> Self {
        markup.0
    }
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove anything that looks like an HTML tag, including an unterminated
/// trailing one.
pub fn strip_tags(s: &str) -> String {
    TAG.replace_all(s, "").into_owned()
}

/// Read an integer the way a loose form field is read: leading digits win,
/// anything else is `0`. Out-of-range numbers saturate.
pub fn leading_int(s: &str) -> i64 {
    let Some(m) = LEADING_INT.find(s.trim_start()) else {
        return 0;
    };

    m.as_str().parse().unwrap_or_else(|_| {
        if m.as_str().starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}
