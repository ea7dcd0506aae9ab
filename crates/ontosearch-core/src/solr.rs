use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::json;

use crate::error::{Result, SearchError};
use crate::models::{Page, PageRequest};
use crate::query::{Filter, SearchField, SearchQuery};

/// One matched index document. Opaque to callers except for named field
/// lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct SolrDocument(serde_json::Map<String, serde_json::Value>);

impl SolrDocument {
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Returns the named field as text. Multivalued fields yield their first
    /// string value.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        match self.0.get(name)? {
            serde_json::Value::String(value) => Some(value.as_str()),
            serde_json::Value::Array(values) => values.iter().find_map(|v| v.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolrConfig {
    pub base_url: String,
    pub core: String,
    pub timeout_ms: u64,
}

impl SolrConfig {
    #[must_use]
    pub fn new(base_url: &str, core: &str, timeout_ms: u64) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            core: core.to_string(),
            timeout_ms,
        }
    }

    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("ONTOSEARCH_SOLR_URL").ok()?;
        let core = std::env::var("ONTOSEARCH_SOLR_CORE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "ontology".to_string());
        let timeout_ms = std::env::var("ONTOSEARCH_SOLR_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(2000);

        Some(Self::new(&base_url, &core, timeout_ms))
    }
}

/// Thin adapter between [`SearchQuery`] descriptors and a Solr core, reached
/// over the JSON request API. The inner HTTP client is connection-pooled and
/// safe to share for the lifetime of the process.
#[derive(Clone)]
pub struct SolrClient {
    config: SolrConfig,
    http: Client,
}

impl std::fmt::Debug for SolrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolrClient")
            .field("base_url", &self.config.base_url)
            .field("core", &self.config.core)
            .finish_non_exhaustive()
    }
}

impl SolrClient {
    pub fn new(config: SolrConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, http })
    }

    #[must_use]
    pub fn config(&self) -> &SolrConfig {
        &self.config
    }

    pub fn health(&self) -> Result<bool> {
        let url = format!(
            "{}/{}/admin/ping",
            self.config.base_url, self.config.core
        );
        let resp = self.http.get(url).send()?;
        Ok(resp.status().is_success())
    }

    /// Executes one paginated search. Zero matches is an empty page, never
    /// an error.
    pub fn search_paginated(
        &self,
        query: &SearchQuery,
        page: &PageRequest,
    ) -> Result<Page<SolrDocument>> {
        let body = build_select_request(query, page);
        let url = format!("{}/{}/select", self.config.base_url, self.config.core);
        let resp = self.http.post(url).json(&body).send()?;
        if !resp.status().is_success() {
            return Err(SearchError::Backend(format!(
                "solr select failed with status {}",
                resp.status()
            )));
        }

        let value = resp.json::<serde_json::Value>()?;
        parse_select_response(&value, page)
    }

    /// Executes a point lookup expecting exactly one logical match. Zero
    /// matches is `NotFound`; more than one indicates index corruption and
    /// fails loudly rather than picking a winner.
    pub fn get_one(&self, query: &SearchQuery) -> Result<SolrDocument> {
        // Two rows are enough to tell "exactly one" from "duplicated".
        let probe = PageRequest::of(0, 2);
        let page = self.search_paginated(query, &probe)?;
        select_single(page, query)
    }
}

pub(crate) fn select_single(page: Page<SolrDocument>, query: &SearchQuery) -> Result<SolrDocument> {
    if page.total == 0 {
        return Err(SearchError::NotFound(format!(
            "no document matched {}",
            describe_filters(query)
        )));
    }
    if page.total > 1 {
        return Err(SearchError::Backend(format!(
            "point lookup matched {} documents for {}",
            page.total,
            describe_filters(query)
        )));
    }
    page.items.into_iter().next().ok_or_else(|| {
        SearchError::Backend("solr reported one match but returned no documents".to_string())
    })
}

pub(crate) fn build_select_request(query: &SearchQuery, page: &PageRequest) -> serde_json::Value {
    let filters = query
        .filters()
        .iter()
        .map(filter_clause)
        .collect::<Vec<_>>();

    let mut body = json!({
        "query": query.search().map_or_else(|| "*:*".to_string(), |s| s.text.clone()),
        "filter": filters,
        "offset": page.offset(),
        "limit": page.size,
    });
    if let Some(sort) = &page.sort {
        body["sort"] = json!(format!("{} {}", sort.field, sort.order.as_str()));
    }
    if let Some(search) = query.search() {
        body["params"] = json!({
            "defType": "edismax",
            "qf": boosted_fields_param(&search.fields),
        });
    }
    body
}

/// Renders one filter. Exact filters use the `{!term}` local-params syntax,
/// which bypasses query-time analysis entirely.
pub(crate) fn filter_clause(filter: &Filter) -> String {
    if filter.exact {
        format!("{{!term f={}}}{}", filter.field, filter.value)
    } else {
        format!("{}:({})", filter.field, filter.value)
    }
}

pub(crate) fn boosted_fields_param(fields: &[SearchField]) -> String {
    fields
        .iter()
        .map(|field| match field.boost {
            Some(boost) => format!("{}^{}", field.name, boost),
            None => field.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn parse_select_response(
    response: &serde_json::Value,
    page: &PageRequest,
) -> Result<Page<SolrDocument>> {
    let body = response
        .get("response")
        .ok_or_else(|| SearchError::Backend("invalid solr response: missing body".to_string()))?;
    let total = body
        .get("numFound")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| {
            SearchError::Backend("invalid solr response: missing numFound".to_string())
        })?;
    let docs = body
        .get("docs")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SearchError::Backend("invalid solr response: missing docs".to_string()))?;

    let items = docs
        .iter()
        .filter_map(|doc| SolrDocument::from_value(doc.clone()))
        .collect::<Vec<_>>();

    Ok(Page {
        items,
        page: page.page,
        size: page.size,
        total,
    })
}

fn describe_filters(query: &SearchQuery) -> String {
    let described = query
        .filters()
        .iter()
        .map(|f| format!("{}={}", f.field, f.value))
        .collect::<Vec<_>>()
        .join(", ");
    if described.is_empty() {
        "an unfiltered query".to_string()
    } else {
        described
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sort, SortOrder};
    use crate::query::parse_search_fields;

    fn individual_query(lang: &str) -> SearchQuery {
        let mut query = SearchQuery::new();
        query.add_filter("lang", lang, true).expect("lang");
        query.add_filter("type", "individual", true).expect("type");
        query
    }

    #[test]
    fn build_select_request_without_text_is_match_all() {
        let query = individual_query("en");
        let body = build_select_request(&query, &PageRequest::of(0, 10));
        assert_eq!(body["query"], "*:*");
        assert_eq!(body["offset"], 0);
        assert_eq!(body["limit"], 10);
        assert!(body.get("params").is_none());

        let filters = body["filter"].as_array().expect("filter array");
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0], "{!term f=lang}en");
        assert_eq!(filters[1], "{!term f=type}individual");
    }

    #[test]
    fn build_select_request_with_text_adds_edismax_params() {
        let mut query = individual_query("en");
        let fields = parse_search_fields("label^100 definition").expect("fields");
        query.set_search(Some("apoptosis"), fields);

        let page = PageRequest::of(2, 25);
        let body = build_select_request(&query, &page);
        assert_eq!(body["query"], "apoptosis");
        assert_eq!(body["offset"], 50);
        assert_eq!(body["limit"], 25);
        assert_eq!(body["params"]["defType"], "edismax");
        assert_eq!(body["params"]["qf"], "label^100 definition");
    }

    #[test]
    fn build_select_request_includes_sort() {
        let query = individual_query("en");
        let page = PageRequest {
            page: 0,
            size: 10,
            sort: Some(Sort {
                field: "label".to_string(),
                order: SortOrder::Desc,
            }),
        };
        let body = build_select_request(&query, &page);
        assert_eq!(body["sort"], "label desc");
    }

    #[test]
    fn filter_clause_keeps_exact_values_unanalyzed() {
        let exact = Filter {
            field: "uri".to_string(),
            value: "http://purl.obolibrary.org/obo/GO_0006915".to_string(),
            exact: true,
        };
        assert_eq!(
            filter_clause(&exact),
            "{!term f=uri}http://purl.obolibrary.org/obo/GO_0006915"
        );

        let fuzzy = Filter {
            field: "annotation".to_string(),
            value: "cell death".to_string(),
            exact: false,
        };
        assert_eq!(filter_clause(&fuzzy), "annotation:(cell death)");
    }

    #[test]
    fn boosted_fields_param_renders_weights() {
        let fields = parse_search_fields("label^100 synonym^2.5 definition").expect("fields");
        assert_eq!(boosted_fields_param(&fields), "label^100 synonym^2.5 definition");
    }

    #[test]
    fn parse_select_response_extracts_docs_and_total() {
        let response = serde_json::json!({
            "responseHeader": {"status": 0},
            "response": {
                "numFound": 42,
                "start": 10,
                "docs": [
                    {"uri": "http://example.com/a", "ontologyId": "go"},
                    {"uri": "http://example.com/b", "ontologyId": "go"}
                ]
            }
        });

        let page = parse_select_response(&response, &PageRequest::of(1, 2)).expect("parse");
        assert_eq!(page.total, 42);
        assert_eq!(page.page, 1);
        assert_eq!(page.size, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].field_str("uri"), Some("http://example.com/a"));
    }

    #[test]
    fn parse_select_response_with_zero_matches_is_an_empty_page() {
        let response = serde_json::json!({
            "response": {"numFound": 0, "start": 0, "docs": []}
        });
        let page = parse_select_response(&response, &PageRequest::of(0, 10)).expect("parse");
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn parse_select_response_rejects_malformed_bodies() {
        for response in [
            serde_json::json!({}),
            serde_json::json!({"response": {}}),
            serde_json::json!({"response": {"numFound": 1}}),
        ] {
            let err =
                parse_select_response(&response, &PageRequest::of(0, 10)).expect_err("malformed");
            assert!(matches!(err, SearchError::Backend(_)));
        }
    }

    fn lookup_query() -> SearchQuery {
        let mut query = individual_query("en");
        query.add_filter("ontologyId", "go", true).expect("ontology");
        query
            .add_filter("uri", "http://example.com/a", true)
            .expect("uri");
        query
    }

    fn lookup_page(uris: &[&str], total: u64) -> Page<SolrDocument> {
        let items = uris
            .iter()
            .map(|uri| {
                SolrDocument::from_value(serde_json::json!({"uri": uri, "ontologyId": "go"}))
                    .expect("doc")
            })
            .collect();
        Page {
            items,
            page: 0,
            size: 2,
            total,
        }
    }

    #[test]
    fn select_single_with_zero_matches_is_not_found() {
        let err = select_single(lookup_page(&[], 0), &lookup_query()).expect_err("empty");
        assert!(matches!(err, SearchError::NotFound(_)));
        assert!(err.to_string().contains("uri=http://example.com/a"));
    }

    #[test]
    fn select_single_returns_the_only_match() {
        let doc =
            select_single(lookup_page(&["http://example.com/a"], 1), &lookup_query()).expect("one");
        assert_eq!(doc.field_str("uri"), Some("http://example.com/a"));
    }

    #[test]
    fn select_single_fails_loudly_on_duplicate_matches() {
        let page = lookup_page(&["http://example.com/a", "http://example.com/a"], 2);
        let err = select_single(page, &lookup_query()).expect_err("duplicates");
        assert!(matches!(err, SearchError::Backend(_)));
        assert!(err.to_string().contains("matched 2 documents"));
    }

    #[test]
    fn field_str_reads_single_and_multivalued_fields() {
        let doc = SolrDocument::from_value(serde_json::json!({
            "label": "apoptosis",
            "lang": ["en", "all"],
            "depth": 3
        }))
        .expect("doc");
        assert_eq!(doc.field_str("label"), Some("apoptosis"));
        assert_eq!(doc.field_str("lang"), Some("en"));
        assert_eq!(doc.field_str("depth"), None);
        assert_eq!(doc.field_str("missing"), None);
    }

    #[test]
    fn config_from_explicit_values_normalizes_base_url() {
        let config = SolrConfig::new("http://localhost:8983/solr/", "ontology", 500);
        assert_eq!(config.base_url, "http://localhost:8983/solr");
        assert_eq!(config.core, "ontology");
    }
}
