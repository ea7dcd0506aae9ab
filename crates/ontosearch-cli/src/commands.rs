use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use ontosearch_core::{
    Individual, IndividualRepository, Page, PageRequest, SearchError, SolrClient, SolrConfig,
};
use serde::Serialize;

use crate::cli::{Cli, Commands, FindArgs, GetArgs};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let client = SolrClient::new(config).context("failed to create solr client")?;

    match cli.command {
        Commands::Ping => ping(&client),
        Commands::Find(args) => {
            let repository = IndividualRepository::new(client);
            report("find", run_find(&repository, &args))
        }
        Commands::Get(args) => {
            let repository = IndividualRepository::new(client);
            report("get", run_get(&repository, &args))
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<SolrConfig> {
    merge_config(cli, SolrConfig::from_env())
}

/// Per-setting resolution: each flag wins over its environment counterpart,
/// and unset flags fall back to the environment, then to the defaults baked
/// into [`SolrConfig::from_env`].
fn merge_config(cli: &Cli, env: Option<SolrConfig>) -> Result<SolrConfig> {
    let base_url = cli
        .solr_url
        .as_deref()
        .or(env.as_ref().map(|c| c.base_url.as_str()))
        .ok_or_else(|| anyhow!("no Solr endpoint: pass --solr-url or set ONTOSEARCH_SOLR_URL"))?;
    let core = cli
        .solr_core
        .as_deref()
        .or(env.as_ref().map(|c| c.core.as_str()))
        .unwrap_or("ontology");
    let timeout_ms = cli
        .timeout_ms
        .or(env.as_ref().map(|c| c.timeout_ms))
        .unwrap_or(2000);
    Ok(SolrConfig::new(base_url, core, timeout_ms))
}

fn ping(client: &SolrClient) -> Result<()> {
    let healthy = client.health().context("solr ping failed")?;
    if !healthy {
        return Err(anyhow!("solr core '{}' is unreachable", client.config().core));
    }
    println!("ok");
    Ok(())
}

fn run_find(
    repository: &IndividualRepository,
    args: &FindArgs,
) -> std::result::Result<Page<Individual>, SearchError> {
    let page = PageRequest {
        page: args.page,
        size: args.size,
        sort: args.sort.clone(),
    };
    let properties = args
        .properties
        .iter()
        .cloned()
        .collect::<HashMap<String, String>>();

    match &args.ontology {
        Some(ontology_id) => repository.find_by_ontology_id(
            ontology_id,
            &page,
            &args.lang,
            args.search.as_deref(),
            args.fields.as_deref(),
            &properties,
        ),
        None => repository.find(
            &page,
            &args.lang,
            args.search.as_deref(),
            args.fields.as_deref(),
            &properties,
        ),
    }
}

fn run_get(
    repository: &IndividualRepository,
    args: &GetArgs,
) -> std::result::Result<Individual, SearchError> {
    repository.get_by_ontology_id_and_uri(&args.ontology, &args.uri, &args.lang)
}

fn report<T: Serialize>(
    operation: &str,
    result: std::result::Result<T, SearchError>,
) -> Result<()> {
    match result {
        Ok(value) => print_json(&value),
        Err(err) => {
            let payload = err.to_payload(operation);
            eprintln!("{}", serde_json::to_string_pretty(&payload)?);
            Err(anyhow!("{operation} failed: {}", err.code()))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
