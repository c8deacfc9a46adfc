use crate::commands::candidates::{load_candidates, CandidateInput};
use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use offerlink_core::domain::Candidate;
use offerlink_core::dto::MatchSummaryDto;
use offerlink_core::matching::match_all;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Read candidates from a JSON file instead of the ATS
    #[arg(long)]
    pub candidates: Option<PathBuf>,
    /// Ignore the candidate cache
    #[arg(long)]
    pub refresh: bool,
}

pub fn match_candidates(ctx: &Context<'_>, args: MatchArgs) -> Result<()> {
    let candidates = load_candidates(
        ctx,
        &CandidateInput {
            file: args.candidates,
            refresh: args.refresh,
        },
    )?;
    let summary = run_matching(ctx, &candidates)?;

    if ctx.json {
        return print_json(&summary);
    }
    print_summary(&summary);
    Ok(())
}

/// Matches `candidates` against every active employee in the directory.
pub fn run_matching(ctx: &Context<'_>, candidates: &[Candidate]) -> Result<MatchSummaryDto> {
    let employees = ctx
        .store
        .employees()
        .list_active()
        .with_context(|| "load active employees")?;
    debug!(
        candidates = candidates.len(),
        employees = employees.len(),
        "matching candidates"
    );

    let results = match_all(candidates, &employees);
    for (candidate, result) in candidates.iter().zip(&results) {
        match (&result.employee_number, result.kind) {
            (Some(number), Some(kind)) => info!(
                candidate = candidate.label(),
                employee = %number,
                kind = kind.as_str(),
                "match found"
            ),
            _ => info!(candidate = candidate.label(), "no match"),
        }
    }

    Ok(MatchSummaryDto::from_results(employees.len(), results))
}

pub fn print_summary(summary: &MatchSummaryDto) {
    for result in &summary.results {
        println!(
            "Candidate {} -> Employee {}",
            result.candidate_email.as_deref().unwrap_or("No email"),
            result.employee_number.as_deref().unwrap_or("No match found")
        );
    }
    println!(
        "Matched {} of {} candidates against {} employees ({} perfect, {} partial)",
        summary.perfect + summary.partial,
        summary.candidates,
        summary.employees,
        summary.perfect,
        summary.partial
    );
}
