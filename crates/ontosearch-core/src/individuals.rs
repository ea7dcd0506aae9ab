use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Individual, Page, PageRequest};
use crate::query::{SearchQuery, parse_search_fields};
use crate::solr::SolrClient;
use crate::validation::{validate_lang, validate_ontology_id};

/// Field spec applied when a free-text search is requested without one:
/// label matches outrank definition matches.
pub const DEFAULT_SEARCH_FIELDS: &str = "label^100 definition";

const TYPE_INDIVIDUAL: &str = "individual";

/// Accessor for ontology individuals backed by the search index.
///
/// Owns its [`SolrClient`] by explicit construction; create one at process
/// startup and share it across requests. Every operation follows the same
/// shape: validate, build a fresh descriptor, execute, map.
#[derive(Debug, Clone)]
pub struct IndividualRepository {
    solr: SolrClient,
}

impl IndividualRepository {
    #[must_use]
    pub fn new(solr: SolrClient) -> Self {
        Self { solr }
    }

    /// Paginated search across all ontologies.
    pub fn find(
        &self,
        page: &PageRequest,
        lang: &str,
        search: Option<&str>,
        search_fields: Option<&str>,
        properties: &HashMap<String, String>,
    ) -> Result<Page<Individual>> {
        validate_lang(lang)?;

        let query = build_find_query(lang, search, search_fields, None, properties)?;
        let found = self.solr.search_paginated(&query, page)?;
        Ok(found.map(|doc| Individual::from_document(&doc, lang)))
    }

    /// Paginated search scoped to one owning ontology.
    pub fn find_by_ontology_id(
        &self,
        ontology_id: &str,
        page: &PageRequest,
        lang: &str,
        search: Option<&str>,
        search_fields: Option<&str>,
        properties: &HashMap<String, String>,
    ) -> Result<Page<Individual>> {
        validate_ontology_id(ontology_id)?;
        validate_lang(lang)?;

        let query = build_find_query(lang, search, search_fields, Some(ontology_id), properties)?;
        let found = self.solr.search_paginated(&query, page)?;
        Ok(found.map(|doc| Individual::from_document(&doc, lang)))
    }

    /// Exact lookup by owning ontology and URI. No free-text clause; zero
    /// matches is `NotFound`.
    pub fn get_by_ontology_id_and_uri(
        &self,
        ontology_id: &str,
        uri: &str,
        lang: &str,
    ) -> Result<Individual> {
        validate_ontology_id(ontology_id)?;
        validate_lang(lang)?;

        let mut query = SearchQuery::new();
        query.add_filter("lang", lang, true)?;
        query.add_filter("type", TYPE_INDIVIDUAL, true)?;
        query.add_filter("ontologyId", ontology_id, true)?;
        query.add_filter("uri", uri, true)?;

        let document = self.solr.get_one(&query)?;
        Ok(Individual::from_document(&document, lang))
    }
}

pub(crate) fn build_find_query(
    lang: &str,
    search: Option<&str>,
    search_fields: Option<&str>,
    ontology_id: Option<&str>,
    properties: &HashMap<String, String>,
) -> Result<SearchQuery> {
    let fields = match (search, search_fields) {
        (Some(_), None) => parse_search_fields(DEFAULT_SEARCH_FIELDS)?,
        (Some(_), Some(spec)) => parse_search_fields(spec)?,
        (None, _) => Vec::new(),
    };

    let mut query = SearchQuery::new();
    query.set_search(search, fields);
    query.add_filter("lang", lang, true)?;
    query.add_filter("type", TYPE_INDIVIDUAL, true)?;
    if let Some(ontology_id) = ontology_id {
        query.add_filter("ontologyId", ontology_id, true)?;
    }
    query.add_dynamic_filter_properties(properties)?;
    Ok(query)
}
