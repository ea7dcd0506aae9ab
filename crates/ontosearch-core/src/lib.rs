//! ontosearch-core: repository-style accessor over a Solr document index
//! for ontology individuals.
//!
//! # Architecture
//!
//! ```text
//! request params ──► validation ──► query (descriptor)
//!                                        │
//!                                        ▼
//!                      solr (executor) ──► models (mapper) ──► caller
//! ```
//!
//! [`IndividualRepository`] composes the pipeline: every operation validates
//! its parameters, builds a fresh backend-agnostic [`query::SearchQuery`],
//! executes it through the shared [`SolrClient`], and maps each raw document
//! into a language-localized [`Individual`].

// Public fallible APIs in this crate share one concrete error contract
// (`SearchError`); per-function `# Errors` sections would restate it.
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod individuals;
pub mod models;
pub mod query;
pub mod solr;
pub mod validation;

pub use error::{Result, SearchError};
pub use individuals::{DEFAULT_SEARCH_FIELDS, IndividualRepository};
pub use models::{Individual, Page, PageRequest, Sort, SortOrder};
pub use solr::{SolrClient, SolrConfig};
pub use validation::LANG_ALL;
