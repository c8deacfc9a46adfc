use crate::commands::candidates::{load_candidates, CandidateInput};
use crate::commands::matching::{print_summary, run_matching};
use crate::commands::offers::{collect_offer_letters, print_report, OfferSettings};
use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use offerlink_core::dto::MatchSummaryDto;
use offerlink_sync::offer::OfferFetchReport;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Ignore the candidate cache
    #[arg(long)]
    pub refresh: bool,
    /// Skip downloading offer letters
    #[arg(long)]
    pub skip_offers: bool,
    #[arg(long)]
    pub days_back: Option<i64>,
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    offers: Option<OfferFetchReport>,
    matches: MatchSummaryDto,
}

/// Candidates, offer letters, employee directory, then matching.
pub fn run_job(ctx: &Context<'_>, args: RunArgs) -> Result<()> {
    let candidates = load_candidates(
        ctx,
        &CandidateInput {
            file: None,
            refresh: args.refresh,
        },
    )?;

    let offers = if args.skip_offers {
        None
    } else {
        Some(collect_offer_letters(
            ctx,
            &candidates,
            &OfferSettings {
                days_back: args.days_back,
                out: args.out,
                use_cache: ctx.config.cache.offer_letters,
            },
        )?)
    };

    let matches = run_matching(ctx, &candidates)?;

    if ctx.json {
        return print_json(&RunReport { offers, matches });
    }

    if let Some(report) = offers.as_ref() {
        print_report(report);
    }
    print_summary(&matches);
    println!("Job completed successfully.");
    Ok(())
}
