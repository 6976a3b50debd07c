//! EXTENDED pages: the scoreboard plus per-player recap metrics.
//!
//! Recap rows are not ordered like the scoreboard, so they are joined by
//! ladder user id rather than position.

use std::collections::{HashMap, HashSet};

use esea_core::{GameRecord, PlayerStatRecord, RecapStats, Side};
use scraper::ElementRef;

use super::scoreboard::{ensure_unique_ids, read_player_link, read_rows, read_score, team_blocks};
use super::{ensure_regulation, team, PageContext, ScoreboardRow};
use crate::error::ExtractError;
use crate::snapshot::PageSnapshot;
use crate::text::{element_text, parse_count, parse_decimal, parse_percentage};

pub(super) fn extract_extended(
    snapshot: &PageSnapshot,
    ctx: &PageContext<'_>,
) -> Result<GameRecord, ExtractError> {
    let [block_a, block_b] = team_blocks(snapshot, ctx)?;
    let score_a = read_score(&block_a, Side::A, ctx)?;
    let score_b = read_score(&block_b, Side::B, ctx)?;
    let rows_a = read_rows(&block_a, Side::A, ctx)?;
    let rows_b = read_rows(&block_b, Side::B, ctx)?;
    ensure_unique_ids(&rows_a, &rows_b, ctx)?;
    ensure_regulation(ctx, score_a, score_b, rows_a.len(), rows_b.len())?;

    let mut recap = read_recap(snapshot, ctx)?;
    let players_a = attach(rows_a, Side::A, &mut recap, ctx)?;
    let players_b = attach(rows_b, Side::B, &mut recap, ctx)?;

    if !recap.is_empty() {
        let mut orphans: Vec<&str> = recap.keys().map(String::as_str).collect();
        orphans.sort_unstable();
        tracing::warn!(
            match_id = %ctx.match_id,
            orphans = ?orphans,
            "recap rows without a scoreboard player were ignored"
        );
    }

    Ok(GameRecord {
        match_id: ctx.match_id,
        variant: ctx.variant,
        team_a: team(score_a, players_a),
        team_b: team(score_b, players_b),
    })
}

/// Recap metrics keyed by external id.
fn read_recap(
    snapshot: &PageSnapshot,
    ctx: &PageContext<'_>,
) -> Result<HashMap<String, RecapStats>, ExtractError> {
    let panel = snapshot
        .first(&ctx.landmarks.recap_panel)
        .ok_or_else(|| ctx.missing("recap_panel"))?;

    let mut by_id = HashMap::new();
    let mut seen = HashSet::new();
    for (row, row_el) in panel.select(&ctx.landmarks.recap_row).enumerate() {
        let (external_id, stats) = read_recap_row(&row_el, row, ctx)?;
        if !seen.insert(external_id.clone()) {
            return Err(ExtractError::DuplicatePlayer {
                match_id: ctx.match_id,
                external_id,
            });
        }
        by_id.insert(external_id, stats);
    }

    if by_id.is_empty() {
        return Err(ctx.missing("recap_row"));
    }
    Ok(by_id)
}

fn read_recap_row(
    row_el: &ElementRef<'_>,
    row: usize,
    ctx: &PageContext<'_>,
) -> Result<(String, RecapStats), ExtractError> {
    let cols = &ctx.landmarks.recap_columns;
    let cells: Vec<ElementRef<'_>> = row_el.select(&ctx.landmarks.cell).collect();
    let bad = |field: &'static str, raw: String| ExtractError::PartialRecapData {
        match_id: ctx.match_id,
        row,
        field,
        raw,
    };
    let cell_text = |idx: usize| cells.get(idx).map(element_text).unwrap_or_default();

    let player_cell = cells
        .get(cols.player)
        .ok_or_else(|| bad("player", String::new()))?;
    let (_, external_id) = read_player_link(player_cell, ctx).map_err(|(f, raw)| bad(f, raw))?;

    let raw = cell_text(cols.assists);
    let assists = parse_count(&raw).ok_or_else(|| bad("assists", raw))?;
    let raw = cell_text(cols.adr);
    let adr = parse_decimal(&raw).ok_or_else(|| bad("adr", raw))?;
    let raw = cell_text(cols.kast_percentage);
    let kast_percentage = parse_percentage(&raw).ok_or_else(|| bad("kast_percentage", raw))?;
    let raw = cell_text(cols.first_kills);
    let first_kills = parse_count(&raw).ok_or_else(|| bad("first_kills", raw))?;

    Ok((
        external_id,
        RecapStats {
            assists,
            adr,
            kast_percentage,
            first_kills,
        },
    ))
}

/// Moves each player's recap entry out of `recap` and onto the record.
fn attach(
    rows: Vec<ScoreboardRow>,
    side: Side,
    recap: &mut HashMap<String, RecapStats>,
    ctx: &PageContext<'_>,
) -> Result<Vec<PlayerStatRecord>, ExtractError> {
    rows.into_iter()
        .map(|row| {
            let stats = recap
                .remove(&row.external_id)
                .ok_or_else(|| ExtractError::MissingRecapRow {
                    match_id: ctx.match_id,
                    side,
                    external_id: row.external_id.clone(),
                })?;
            Ok(row.into_player(Some(stats)))
        })
        .collect()
}
