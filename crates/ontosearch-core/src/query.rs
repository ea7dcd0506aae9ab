use std::collections::HashMap;

use crate::error::{Result, SearchError};

/// Filter field names owned by the accessor itself. Dynamic property filters
/// must not shadow these.
pub const RESERVED_FILTER_FIELDS: [&str; 4] = ["lang", "type", "ontologyId", "uri"];

/// One field targeted by the free-text clause, with an optional boost weight.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchField {
    pub name: String,
    pub boost: Option<f64>,
}

/// One conjunctive constraint. Exact filters are matched verbatim by the
/// backend; non-exact values go through query-time analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: String,
    pub exact: bool,
}

/// Backend-agnostic query description: an optional free-text clause plus an
/// ordered list of conjunctive filters.
///
/// Created fresh per request by the issuing accessor method and discarded
/// after execution; never shared or cached across requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    search: Option<SearchClause>,
    filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchClause {
    pub text: String,
    pub fields: Vec<SearchField>,
}

impl SearchQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text clause. Absent text leaves the query filter-only;
    /// the caller supplies the field spec (including any default).
    pub fn set_search(&mut self, text: Option<&str>, fields: Vec<SearchField>) {
        self.search = text.map(|text| SearchClause {
            text: text.to_string(),
            fields,
        });
    }

    /// Appends one filter. Call order is preserved so query generation is
    /// deterministic.
    pub fn add_filter(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
        exact: bool,
    ) -> Result<()> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(SearchError::InvalidParameter(
                "filter field name must not be empty".to_string(),
            ));
        }
        self.filters.push(Filter {
            field,
            value: value.into(),
            exact,
        });
        Ok(())
    }

    /// Merges caller-supplied property filters, each exact-match. An empty
    /// map is a no-op. Entries are appended sorted by key so identical
    /// requests generate identical backend queries. Keys colliding with
    /// [`RESERVED_FILTER_FIELDS`] are rejected.
    pub fn add_dynamic_filter_properties(
        &mut self,
        properties: &HashMap<String, String>,
    ) -> Result<()> {
        let mut entries = properties.iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (key, value) in entries {
            if RESERVED_FILTER_FIELDS.contains(&key.as_str()) {
                return Err(SearchError::InvalidParameter(format!(
                    "dynamic filter property '{key}' collides with a reserved filter field"
                )));
            }
            self.add_filter(key.as_str(), value.as_str(), true)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn search(&self) -> Option<&SearchClause> {
        self.search.as_ref()
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }
}

/// Parses a field-boost spec string: whitespace/comma separated tokens of
/// the form `name` or `name^boost`, e.g. `label^100 definition`.
pub fn parse_search_fields(spec: &str) -> Result<Vec<SearchField>> {
    let mut fields = Vec::<SearchField>::new();
    for token in spec.split([' ', ',', '\t']).filter(|t| !t.is_empty()) {
        let (name, boost) = match token.split_once('^') {
            Some((name, raw)) => {
                let boost = raw.parse::<f64>().ok().filter(|b| b.is_finite() && *b > 0.0);
                let Some(boost) = boost else {
                    return Err(SearchError::InvalidParameter(format!(
                        "invalid boost '{raw}' in search field '{token}'"
                    )));
                };
                (name, Some(boost))
            }
            None => (token, None),
        };
        if name.is_empty() {
            return Err(SearchError::InvalidParameter(format!(
                "search field name must not be empty in '{spec}'"
            )));
        }
        fields.push(SearchField {
            name: name.to_string(),
            boost,
        });
    }

    if fields.is_empty() {
        return Err(SearchError::InvalidParameter(
            "search field spec must name at least one field".to_string(),
        ));
    }
    Ok(fields)
}
