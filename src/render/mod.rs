//! HTML generation. Every value interpolated into a [`Template`] is escaped
//! unless it is already [`Markup`] produced by another template.

mod pages;

pub use pages::{BoardPage, ErrorPage, SearchPage};

use std::{collections::HashMap, fmt};

use tracing::warn;

/// Rendered, already-escaped HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::iter::FromIterator<Markup> for Markup {
    fn from_iter<I: IntoIterator<Item = Markup>>(iter: I) -> Self {
        Markup(iter.into_iter().map(|m| m.0).collect())
    }
}

/// A static HTML source with `{{key}}` placeholders.
pub struct Template {
    source: &'static str,
    values: HashMap<&'static str, String>,
}

impl Template {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            values: HashMap::new(),
        }
    }

    /// Sets a placeholder that appears in element content.
    pub fn text(mut self, key: &'static str, value: &str) -> Self {
        self.values
            .insert(key, html_escape::encode_safe(value).into_owned());
        self
    }

    /// Sets a placeholder that appears inside a double-quoted attribute.
    pub fn attr(mut self, key: &'static str, value: &str) -> Self {
        self.values.insert(
            key,
            html_escape::encode_double_quoted_attribute(value).into_owned(),
        );
        self
    }

    pub fn markup(mut self, key: &'static str, value: Markup) -> Self {
        self.values.insert(key, value.0);
        self
    }

    pub fn render(&self) -> Markup {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source;
        while let Some(start) = rest.find("{{") {
            let end = match rest[start + 2..].find("}}") {
                Some(end) => start + 2 + end,
                None => break,
            };
            out.push_str(&rest[..start]);
            let key = rest[start + 2..end].trim();
            match self.values.get(key) {
                Some(value) => out.push_str(value),
                None => warn!(key, "template placeholder has no value"),
            }
            rest = &rest[end + 2..];
        }
        out.push_str(rest);
        Markup(out)
    }
}
