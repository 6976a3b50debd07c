//! Scoreboard reading: team blocks, scores and positional player rows.

use std::collections::HashSet;

use esea_core::{GameRecord, PlayerStatRecord, Side};
use scraper::ElementRef;

use super::{ensure_regulation, team, PageContext, ScoreboardRow};
use crate::error::ExtractError;
use crate::snapshot::PageSnapshot;
use crate::text::{element_text, external_id, parse_count, parse_decimal, parse_percentage};

pub(super) fn extract_base(
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

    let players = |rows: Vec<ScoreboardRow>| -> Vec<PlayerStatRecord> {
        rows.into_iter().map(|r| r.into_player(None)).collect()
    };
    Ok(GameRecord {
        match_id: ctx.match_id,
        variant: ctx.variant,
        team_a: team(score_a, players(rows_a)),
        team_b: team(score_b, players(rows_b)),
    })
}

/// The two team blocks inside the scoreboard, side A first.
pub(super) fn team_blocks<'a>(
    snapshot: &'a PageSnapshot,
    ctx: &PageContext<'_>,
) -> Result<[ElementRef<'a>; 2], ExtractError> {
    let board = snapshot
        .first(&ctx.landmarks.scoreboard)
        .ok_or_else(|| ctx.missing("scoreboard"))?;

    let blocks: Vec<ElementRef<'a>> = board.select(&ctx.landmarks.team_block).collect();
    match blocks.as_slice() {
        [] => Err(ctx.missing("team_block")),
        [a, b] => Ok([*a, *b]),
        _ => Err(ExtractError::TeamBlockCount {
            match_id: ctx.match_id,
            found: blocks.len(),
        }),
    }
}

pub(super) fn read_score(
    block: &ElementRef<'_>,
    side: Side,
    ctx: &PageContext<'_>,
) -> Result<u32, ExtractError> {
    let score_el = block
        .select(&ctx.landmarks.team_score)
        .next()
        .ok_or_else(|| ctx.missing("team_score"))?;
    let raw = element_text(&score_el);
    parse_count(&raw).ok_or(ExtractError::MalformedScore {
        match_id: ctx.match_id,
        side,
        raw,
    })
}

/// Player rows of one team block in document order.
pub(super) fn read_rows(
    block: &ElementRef<'_>,
    side: Side,
    ctx: &PageContext<'_>,
) -> Result<Vec<ScoreboardRow>, ExtractError> {
    block
        .select(&ctx.landmarks.player_row)
        .enumerate()
        .map(|(row, el)| read_row(&el, side, row, ctx))
        .collect()
}

fn read_row(
    row_el: &ElementRef<'_>,
    side: Side,
    row: usize,
    ctx: &PageContext<'_>,
) -> Result<ScoreboardRow, ExtractError> {
    let landmarks = ctx.landmarks;
    let cols = &landmarks.scoreboard_columns;
    let cells: Vec<ElementRef<'_>> = row_el.select(&landmarks.cell).collect();
    let bad = |field: &'static str, raw: String| ExtractError::PartialData {
        match_id: ctx.match_id,
        side,
        row,
        field,
        raw,
    };
    let cell_text = |idx: usize| cells.get(idx).map(element_text).unwrap_or_default();

    let player_cell = cells
        .get(cols.player)
        .ok_or_else(|| bad("player", String::new()))?;
    let (name, external_id) = read_player_link(player_cell, ctx).map_err(|(f, raw)| bad(f, raw))?;

    let raw = cell_text(cols.rating);
    let rating = parse_decimal(&raw).ok_or_else(|| bad("rating", raw))?;
    let raw = cell_text(cols.kills);
    let kills = parse_count(&raw).ok_or_else(|| bad("kills", raw))?;
    let raw = cell_text(cols.deaths);
    let deaths = parse_count(&raw).ok_or_else(|| bad("deaths", raw))?;
    let raw = cell_text(cols.headshot_percentage);
    let headshot_percentage =
        parse_percentage(&raw).ok_or_else(|| bad("headshot_percentage", raw))?;

    Ok(ScoreboardRow {
        name,
        external_id,
        rating,
        kills,
        deaths,
        headshot_percentage,
    })
}

/// Reads `(name, external_id)` from the profile link inside a player cell.
/// On failure returns the field that could not be read and its raw text.
pub(super) fn read_player_link(
    cell: &ElementRef<'_>,
    ctx: &PageContext<'_>,
) -> Result<(String, String), (&'static str, String)> {
    let link = cell
        .select(&ctx.landmarks.player_link)
        .next()
        .ok_or_else(|| ("external_id", element_text(cell)))?;
    let href = link.value().attr("href").unwrap_or_default();
    let id = external_id(href, &ctx.landmarks.player_href)
        .ok_or_else(|| ("external_id", href.to_string()))?;
    let name = element_text(&link);
    if name.is_empty() {
        return Err(("name", name));
    }
    Ok((name, id))
}

/// Ids are the join key for recap data and downstream storage; a repeat
/// means the page is not what it claims to be.
pub(super) fn ensure_unique_ids(
    rows_a: &[ScoreboardRow],
    rows_b: &[ScoreboardRow],
    ctx: &PageContext<'_>,
) -> Result<(), ExtractError> {
    let mut seen = HashSet::new();
    for row in rows_a.iter().chain(rows_b) {
        if !seen.insert(row.external_id.as_str()) {
            return Err(ExtractError::DuplicatePlayer {
                match_id: ctx.match_id,
                external_id: row.external_id.clone(),
            });
        }
    }
    Ok(())
}
