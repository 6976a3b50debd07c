//! The scrape pipeline: fetch, classify, extract and persist, one match at a
//! time. A failure on one match is logged and counted; the run continues.

use anyhow::Context;
use esea_core::{MatchId, PageVariant};
use esea_scraper::{
    classify, extract, CompiledLandmarks, ExtractError, PageFetcher, PageSnapshot, SessionTracker,
};
use esea_store::GameStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchOutcome {
    /// Extracted and saved.
    Stored(PageVariant),
    /// Extracted during a dry run; nothing saved.
    Extracted(PageVariant),
    SkippedInvalid,
}

#[derive(Debug, Default)]
pub(crate) struct ScrapeSummary {
    pub outcomes: Vec<(MatchId, MatchOutcome)>,
    pub extracted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Runs one match through the pipeline.
///
/// A fetch session is held for the whole call and released on every return
/// path. INVALID pages are skipped without calling `extract`.
///
/// # Errors
///
/// Returns an error if the fetch, extraction or save fails.
pub(crate) async fn process_match<F: PageFetcher>(
    fetcher: &F,
    store: Option<&dyn GameStore>,
    landmarks: &CompiledLandmarks,
    sessions: &SessionTracker,
    match_id: MatchId,
) -> anyhow::Result<MatchOutcome> {
    let _session = sessions.acquire(match_id);

    let page = fetcher
        .fetch(match_id)
        .await
        .with_context(|| format!("failed to fetch match {match_id}"))?;
    let snapshot = PageSnapshot::from_page(&page);

    let variant = classify(&snapshot, landmarks);
    if variant == PageVariant::Invalid {
        tracing::info!(%match_id, "page is INVALID, skipping");
        return Ok(MatchOutcome::SkippedInvalid);
    }

    let record = extract(&snapshot, variant, landmarks)
        .with_context(|| format!("failed to extract {variant} match {match_id}"))?;

    let Some(store) = store else {
        return Ok(MatchOutcome::Extracted(variant));
    };
    store
        .save(&record)
        .with_context(|| format!("failed to store match {match_id}"))?;
    tracing::info!(
        %match_id,
        %variant,
        score_a = record.team_a.score,
        score_b = record.team_b.score,
        "stored game record"
    );
    Ok(MatchOutcome::Stored(variant))
}

/// Processes `match_ids` in order and tallies the results.
pub(crate) async fn run_scrape<F: PageFetcher>(
    fetcher: &F,
    store: Option<&dyn GameStore>,
    landmarks: &CompiledLandmarks,
    sessions: &SessionTracker,
    match_ids: &[MatchId],
) -> ScrapeSummary {
    let mut summary = ScrapeSummary::default();

    for &match_id in match_ids {
        match process_match(fetcher, store, landmarks, sessions, match_id).await {
            Ok(outcome) => {
                match outcome {
                    MatchOutcome::Stored(_) | MatchOutcome::Extracted(_) => summary.extracted += 1,
                    MatchOutcome::SkippedInvalid => summary.skipped += 1,
                }
                summary.outcomes.push((match_id, outcome));
            }
            Err(err) => {
                let kind = err.downcast_ref::<ExtractError>().map(ExtractError::kind);
                let error = format!("{err:#}");
                tracing::error!(%match_id, ?kind, %error, "match failed");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        extracted = summary.extracted,
        skipped = summary.skipped,
        failed = summary.failed,
        "scrape run finished"
    );
    summary
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
