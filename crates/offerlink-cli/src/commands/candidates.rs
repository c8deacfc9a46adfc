use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use offerlink_core::domain::Candidate;
use offerlink_sync::ats;
use offerlink_sync::cache::{self, CANDIDATE_CACHE_FILE};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct CandidatesArgs {
    /// Ignore the candidate cache and query the ATS again
    #[arg(long)]
    pub refresh: bool,
}

/// Where candidates come from for commands that consume them.
#[derive(Debug, Clone, Default)]
pub struct CandidateInput {
    pub file: Option<PathBuf>,
    pub refresh: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CandidateFile {
    List(Vec<Candidate>),
    Listing { candidates: Vec<Candidate> },
}

pub fn list_candidates(ctx: &Context<'_>, args: CandidatesArgs) -> Result<()> {
    let candidates = load_candidates(
        ctx,
        &CandidateInput {
            file: None,
            refresh: args.refresh,
        },
    )?;

    if ctx.json {
        return print_json(&candidates);
    }

    if candidates.is_empty() {
        println!("No candidates in the configured workflow states.");
        return Ok(());
    }
    for candidate in &candidates {
        println!(
            "{}  {} {}  [{}]",
            candidate.label(),
            candidate.first_name.as_deref().unwrap_or("-"),
            candidate.last_name.as_deref().unwrap_or("-"),
            candidate.workflow_state().unwrap_or("-"),
        );
    }
    println!("Total candidates: {}", candidates.len());
    Ok(())
}

/// Loads candidates from an explicit file, the cache, or the ATS, in that order.
pub fn load_candidates(ctx: &Context<'_>, input: &CandidateInput) -> Result<Vec<Candidate>> {
    if let Some(path) = input.file.as_deref() {
        return read_candidate_file(path);
    }

    let use_cache = ctx.config.cache.candidates;
    let cache_path = if use_cache {
        Some(ctx.cache_file(CANDIDATE_CACHE_FILE)?)
    } else {
        None
    };

    if let (Some(path), false) = (cache_path.as_deref(), input.refresh) {
        if let Some(cached) = cache::load_cached::<Vec<Candidate>>(path)
            .with_context(|| format!("read candidate cache {}", path.display()))?
        {
            info!(count = cached.len(), "loaded cached candidates");
            return Ok(cached);
        }
    }

    let client = ctx.ats_client()?;
    let candidates = ats::fetch_candidates(
        &client,
        ctx.config.ats.page_size,
        &ctx.config.ats.workflow_states,
    )
    .with_context(|| "fetch candidates")?;

    if let Some(path) = cache_path.as_deref() {
        cache::store_cached(path, &candidates)
            .with_context(|| format!("write candidate cache {}", path.display()))?;
        debug!(path = %path.display(), "candidate cache updated");
    }
    Ok(candidates)
}

fn read_candidate_file(path: &Path) -> Result<Vec<Candidate>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read candidates file {}", path.display()))?;
    let parsed: CandidateFile = serde_json::from_str(&data)
        .with_context(|| format!("parse candidates file {}", path.display()))?;
    Ok(match parsed {
        CandidateFile::List(list) => list,
        CandidateFile::Listing { candidates } => candidates,
    })
}
