use crate::commands::candidates::{load_candidates, CandidateInput};
use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{format_ms_date, now_utc_ms};
use anyhow::{Context as _, Result};
use clap::Args;
use offerlink_config::MAX_DAYS_BACK;
use offerlink_core::domain::Candidate;
use offerlink_sync::cache::{self, OFFER_LETTER_CACHE_FILE};
use offerlink_sync::offer::{self, OfferFetchOptions, OfferFetchReport, OfferLetterRecord};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct OffersArgs {
    /// Only keep letters created within this many days
    #[arg(long)]
    pub days_back: Option<i64>,
    /// Directory for downloaded PDFs
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Reuse the offer letter cache when present
    #[arg(long)]
    pub use_cache: bool,
    /// Read candidates from a JSON file instead of the ATS
    #[arg(long)]
    pub candidates: Option<PathBuf>,
    /// Ignore the candidate cache
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OfferSettings {
    pub days_back: Option<i64>,
    pub out: Option<PathBuf>,
    pub use_cache: bool,
}

pub fn fetch_offers(ctx: &Context<'_>, args: OffersArgs) -> Result<()> {
    let candidates = load_candidates(
        ctx,
        &CandidateInput {
            file: args.candidates,
            refresh: args.refresh,
        },
    )?;
    let report = collect_offer_letters(
        ctx,
        &candidates,
        &OfferSettings {
            days_back: args.days_back,
            out: args.out,
            use_cache: args.use_cache || ctx.config.cache.offer_letters,
        },
    )?;

    if ctx.json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

/// Loads cached letter metadata when allowed, otherwise downloads letters and
/// refreshes the cache.
pub fn collect_offer_letters(
    ctx: &Context<'_>,
    candidates: &[Candidate],
    settings: &OfferSettings,
) -> Result<OfferFetchReport> {
    let days_back = settings.days_back.unwrap_or(ctx.config.offers.days_back);
    if days_back <= 0 || days_back > MAX_DAYS_BACK {
        return Err(invalid_input(format!(
            "--days-back must be between 1 and {MAX_DAYS_BACK}"
        )));
    }

    let cache_path = ctx.cache_file(OFFER_LETTER_CACHE_FILE)?;
    if settings.use_cache {
        if let Some(letters) = cache::load_cached::<Vec<OfferLetterRecord>>(&cache_path)
            .with_context(|| format!("read offer letter cache {}", cache_path.display()))?
        {
            info!(count = letters.len(), "loaded cached offer letters");
            return Ok(OfferFetchReport {
                letters,
                ..Default::default()
            });
        }
    }

    let output_dir = settings
        .out
        .clone()
        .unwrap_or_else(|| ctx.config.offers.output_dir.clone());
    let client = ctx.offer_client()?;
    let options = OfferFetchOptions {
        now_utc_ms: now_utc_ms(),
        days_back,
        output_dir,
    };
    let report = offer::fetch_offer_letters(&client, candidates, &options)
        .with_context(|| "fetch offer letters")?;

    cache::store_cached(&cache_path, &report.letters)
        .with_context(|| format!("write offer letter cache {}", cache_path.display()))?;
    Ok(report)
}

pub fn print_report(report: &OfferFetchReport) {
    for letter in &report.letters {
        let saved = letter
            .saved_to
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "not saved".to_string());
        println!(
            "{}  {}  created {}  -> {}",
            letter.application_id,
            letter.candidate_email.as_deref().unwrap_or("No email"),
            format_ms_date(letter.created_at_ms),
            saved
        );
    }
    println!(
        "Total offer letters fetched: {} (saved {}, skipped {})",
        report.letters.len(),
        report.saved_count(),
        report.skipped
    );
    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("- {}", warning);
        }
    }
}
