use clap::{Args, Parser, Subcommand};
use ontosearch_core::{Sort, SortOrder};

#[derive(Debug, Parser)]
#[command(name = "ontosearch")]
#[command(about = "Search ontology individuals in a Solr index", version)]
pub struct Cli {
    /// Solr base URL; falls back to ONTOSEARCH_SOLR_URL.
    #[arg(long)]
    pub solr_url: Option<String>,

    /// Solr core name; falls back to ONTOSEARCH_SOLR_CORE, then "ontology".
    #[arg(long)]
    pub solr_core: Option<String>,

    /// Backend request timeout in milliseconds; falls back to
    /// ONTOSEARCH_SOLR_TIMEOUT_MS, then 2000.
    #[arg(long, value_parser = parse_min_one_u64)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Paginated search, optionally scoped to one ontology.
    Find(FindArgs),
    /// Exact lookup of one individual by ontology and URI.
    Get(GetArgs),
    /// Check that the Solr core answers.
    Ping,
}

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Free-text query; omit for a filter-only listing.
    pub search: Option<String>,

    /// Restrict results to one owning ontology (lowercase short name).
    #[arg(long)]
    pub ontology: Option<String>,

    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Zero-based page index.
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    #[arg(long, default_value_t = 10, value_parser = parse_min_one_usize)]
    pub size: usize,

    /// Field-boost spec for the free-text clause, e.g. "label^100 definition".
    #[arg(long)]
    pub fields: Option<String>,

    /// Extra exact-match filter, repeatable: --property obsolete=false
    #[arg(long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Sort spec: "<field> asc" or "<field> desc".
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<Sort>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Owning ontology (lowercase short name).
    pub ontology: String,

    /// Exact entity URI.
    pub uri: String,

    #[arg(long, default_value = "en")]
    pub lang: String,
}

fn parse_min_one_u64(raw: &str) -> std::result::Result<u64, String> {
    let value = raw
        .parse::<u64>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}

fn parse_min_one_usize(raw: &str) -> std::result::Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}

fn parse_property(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("property must use 'key=value' format, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("property key must not be empty in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_sort(raw: &str) -> std::result::Result<Sort, String> {
    let mut parts = raw.split_whitespace();
    let field = parts
        .next()
        .ok_or_else(|| "sort spec must name a field".to_string())?;
    let order = match parts.next() {
        None | Some("asc") => SortOrder::Asc,
        Some("desc") => SortOrder::Desc,
        Some(other) => return Err(format!("sort order must be 'asc' or 'desc', got '{other}'")),
    };
    if parts.next().is_some() {
        return Err(format!("sort spec has trailing tokens: '{raw}'"));
    }
    Ok(Sort {
        field: field.to_string(),
        order,
    })
}
