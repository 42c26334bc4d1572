use anyhow::{Context, Result};
use ureq::Agent;

use crate::directory::model::{map_results, ApiStation, Station};
use crate::shared::constants;
use crate::utils::logger;

/// Search the directory by station name.
///
/// Any network or parse failure is logged and collapses to an empty list;
/// empty means "try another query", never a fatal condition.
pub fn search_stations(query: &str, limit: usize) -> Vec<Station> {
    run_search("name", query, limit)
}

/// Search the directory by genre tag.
pub fn search_by_genre(genre: &str, limit: usize) -> Vec<Station> {
    run_search("tag", genre, limit)
}

fn run_search(field: &str, value: &str, limit: usize) -> Vec<Station> {
    logger::debug(&format!("directory query {}={} limit={}", field, value, limit));
    match fetch(field, value, limit) {
        Ok(records) => map_results(records, limit),
        Err(err) => {
            logger::error(&format!("directory search failed ({}={}): {:#}", field, value, err));
            eprintln!("Station search failed: {}", err);
            Vec::new()
        }
    }
}

fn fetch(field: &str, value: &str, limit: usize) -> Result<Vec<ApiStation>> {
    let config = Agent::config_builder()
        .timeout_global(Some(constants::SEARCH_TIMEOUT))
        .build();
    let agent: Agent = config.into();

    let mut response = agent
        .get(constants::SEARCH_ENDPOINT)
        .query(field, value)
        .query("limit", &limit.to_string())
        .query("hidebroken", "true")
        .query("order", "votes")
        .query("reverse", "true")
        .call()
        .with_context(|| format!("GET {}", constants::SEARCH_ENDPOINT))?;

    let records: Vec<ApiStation> = response
        .body_mut()
        .read_json()
        .context("failed to decode directory response")?;

    Ok(records)
}
