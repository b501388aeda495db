//! Core data types for the book catalog.
//!
//! `CatalogItem` is the strict boundary schema for every book record that
//! crosses the wire. Remote payloads are validated and defaulted on ingress
//! (see [`parse_items`]) instead of being trusted at each call site.

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier prefix reserved for locally bundled practice items.
pub const PRACTICE_ID_PREFIX: &str = "practice-sample-";

/// Title used when a saved item carries none.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Author used when a saved item carries none.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Default excerpt length for descriptions in list views.
pub const EXCERPT_CHARS: usize = 200;

/// Inline SVG shown when an item has no thumbnail.
pub const PLACEHOLDER_THUMBNAIL: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMTAwIiBoZWlnaHQ9IjE0MCIgdmlld0JveD0iMCAwIDEwMCAxNDAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+CjxyZWN0IHdpZHRoPSIxMDAiIGhlaWdodD0iMTQwIiBmaWxsPSIjRjVGNUY1Ii8+Cjx0ZXh0IHg9IjUwIiB5PSI3MCIgZmlsbD0iIzk5OTk5OSIgdGV4dC1hbmNob3I9Im1pZGRsZSIgZm9udC1mYW1pbHk9IkFyaWFsIiBmb250LXNpemU9IjEyIj5ObyBJbWFnZTwvdGV4dD4KPC9zdmc+";

/// Whether an identifier belongs to the local practice set.
pub fn is_practice_id(id: &str) -> bool {
    id.starts_with(PRACTICE_ID_PREFIX)
}

/// A book record from search results, the practice set, or the saved collection.
///
/// Two items are the same entity iff their `id`s are equal; use
/// [`CatalogItem::same_entity`] rather than `==` when comparing records
/// from different sources.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable external identifier.
    /// Left off the wire when empty so the service can assign one.
    #[serde(
        rename = "googleBooksId",
        alias = "id",
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_default"
    )]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Free-form; not guaranteed to parse as a date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URI or inline-encoded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub categories: Vec<String>,
    /// 0.0 to 5.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_negative_count"
    )]
    pub ratings_count: Option<u32>,
    /// Derived from collection membership. Never sent, never read from the wire.
    #[serde(skip)]
    pub is_saved: bool,
}

impl CatalogItem {
    /// Minimal record with an identifier and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_rating(mut self, average: f64, count: u32) -> Self {
        self.average_rating = Some(average);
        self.ratings_count = Some(count);
        self
    }

    /// Identity comparison: same external identifier, regardless of other fields.
    pub fn same_entity(&self, other: &CatalogItem) -> bool {
        self.id == other.id
    }

    /// Whether this item belongs to the local practice set.
    pub fn is_practice(&self) -> bool {
        is_practice_id(&self.id)
    }

    /// Validate a record received from the remote service.
    ///
    /// Returns `None` when the record has no usable identifier. Ratings are
    /// clamped into range and `is_saved` is reset, since saved state is only
    /// ever derived locally.
    pub fn sanitized(mut self) -> Option<Self> {
        let id = self.id.trim();
        if id.is_empty() {
            return None;
        }
        if id.len() != self.id.len() {
            self.id = id.to_string();
        }
        self.average_rating = self
            .average_rating
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 5.0));
        self.is_saved = false;
        Some(self)
    }

    /// Fill placeholder values for fields the collection requires.
    ///
    /// Missing title becomes [`UNKNOWN_TITLE`], missing authors become
    /// [`UNKNOWN_AUTHOR`], missing numeric fields become zero.
    pub fn with_save_defaults(mut self) -> Self {
        self.id = self.id.trim().to_string();
        if self.title.trim().is_empty() {
            self.title = UNKNOWN_TITLE.to_string();
        }
        self.authors.retain(|a| !a.trim().is_empty());
        if self.authors.is_empty() {
            self.authors.push(UNKNOWN_AUTHOR.to_string());
        }
        if self.average_rating.is_none() {
            self.average_rating = Some(0.0);
        }
        if self.ratings_count.is_none() {
            self.ratings_count = Some(0);
        }
        self
    }

    /// Thumbnail reference, or the inline placeholder when absent.
    pub fn thumbnail_or_placeholder(&self) -> &str {
        match self.thumbnail.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => PLACEHOLDER_THUMBNAIL,
        }
    }

    /// Description cut to `max_chars` characters, with `...` appended when cut.
    pub fn description_excerpt(&self, max_chars: usize) -> String {
        let Some(text) = self.description.as_deref() else {
            return String::new();
        };
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        }
    }

    /// One star per full rating point, plus one for a half point or more.
    pub fn star_rating(&self) -> String {
        let Some(rating) = self.average_rating else {
            return String::new();
        };
        let rating = rating.clamp(0.0, 5.0);
        let full = rating.floor() as usize;
        let half = rating.fract() >= 0.5;
        "⭐".repeat(full + usize::from(half))
    }

    /// Authors joined for display.
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            self.authors.join(", ")
        }
    }
}

/// Validate a batch of remote records, dropping those that cannot be identified.
pub fn parse_items(values: Vec<serde_json::Value>, endpoint: &str) -> Vec<CatalogItem> {
    let total = values.len();
    let items: Vec<CatalogItem> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<CatalogItem>(value) {
            Ok(item) => item.sanitized(),
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "dropping malformed catalog item");
                None
            }
        })
        .collect();
    if items.len() != total {
        tracing::warn!(
            endpoint,
            dropped = total - items.len(),
            "some catalog items were rejected on ingress"
        );
    }
    items
}

/// Recognized search options. Unset or blank fields are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl QueryFields {
    /// A single free-text query.
    pub fn free_text(query: impl Into<String>) -> Self {
        Self {
            free_text: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Trim every field and turn blank ones into `None`.
    pub fn normalized(&self) -> Self {
        fn clean(field: &Option<String>) -> Option<String> {
            field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }
        Self {
            free_text: clean(&self.free_text),
            title: clean(&self.title),
            author: clean(&self.author),
            description: clean(&self.description),
            subject: clean(&self.subject),
        }
    }

    /// True when no field carries a non-blank value.
    pub fn is_empty(&self) -> bool {
        self.params().is_empty()
    }

    /// True when any structured field (title, author, description) is set.
    pub fn is_advanced(&self) -> bool {
        let n = self.normalized();
        n.title.is_some() || n.author.is_some() || n.description.is_some()
    }

    /// Wire parameters for the set fields only, in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let n = self.normalized();
        [
            ("q", n.free_text),
            ("title", n.title),
            ("author", n.author),
            ("description", n.description),
            ("subject", n.subject),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_negative_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.map(|n| n.clamp(0, i64::from(u32::MAX)) as u32))
}
