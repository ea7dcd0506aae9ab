use serde::{Deserialize, Serialize};

use crate::solr::SolrDocument;
use crate::validation::LANG_ALL;

/// One requested slice of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: usize,
    /// Page size; the backend receives it as the row limit.
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

impl PageRequest {
    #[must_use]
    pub fn of(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// An ordered slice of results plus total-count metadata. Owned by the
/// caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(self.size as u64)
    }

    /// Projects every item while keeping the pagination metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}

/// An ontology-class instance projected into one requested language.
///
/// Constructed only by [`Individual::from_document`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub ontology_id: String,
    pub uri: String,
    pub lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl Individual {
    /// Maps one raw index document into the requested language.
    ///
    /// Localized text resolves through an explicit fallback chain:
    /// `<field>_<lang>`, then the language-unqualified `<field>`, then
    /// `None`. Requesting [`LANG_ALL`] reads the unqualified field directly.
    #[must_use]
    pub fn from_document(document: &SolrDocument, lang: &str) -> Self {
        Self {
            ontology_id: document.field_str("ontologyId").unwrap_or_default().to_string(),
            uri: document.field_str("uri").unwrap_or_default().to_string(),
            lang: lang.to_string(),
            label: localized_field(document, "label", lang),
            definition: localized_field(document, "definition", lang),
        }
    }
}

fn localized_field(document: &SolrDocument, field: &str, lang: &str) -> Option<String> {
    if lang != LANG_ALL {
        if let Some(value) = document.field_str(&format!("{field}_{lang}")) {
            return Some(value.to_string());
        }
    }
    document.field_str(field).map(ToString::to_string)
}
