//! FORFEIT pages: forced score, best-effort rosters.

use esea_core::{GameRecord, PlayerStatRecord, Side, WIN_THRESHOLD};

use super::scoreboard::{ensure_unique_ids, read_rows, team_blocks};
use super::{team, PageContext};
use crate::error::ExtractError;
use crate::snapshot::PageSnapshot;

pub(super) fn extract_forfeit(
    snapshot: &PageSnapshot,
    ctx: &PageContext<'_>,
) -> Result<GameRecord, ExtractError> {
    let banner = snapshot
        .first(&ctx.landmarks.forfeit_banner)
        .ok_or_else(|| ctx.missing("forfeit_banner"))?;
    let raw = banner
        .value()
        .attr(&ctx.landmarks.forfeit_team_attr)
        .unwrap_or_default();
    let forfeiting = parse_forfeit_side(raw).ok_or_else(|| ExtractError::ForfeitSide {
        match_id: ctx.match_id,
        raw: raw.to_string(),
    })?;

    let winner = forfeiting.other();
    let score = |side: Side| if side == winner { WIN_THRESHOLD } else { 0 };
    let (players_a, players_b) = residual_players(snapshot, ctx);

    Ok(GameRecord {
        match_id: ctx.match_id,
        variant: ctx.variant,
        team_a: team(score(Side::A), players_a),
        team_b: team(score(Side::B), players_b),
    })
}

fn parse_forfeit_side(raw: &str) -> Option<Side> {
    match raw.trim() {
        "1" | "a" | "A" => Some(Side::A),
        "2" | "b" | "B" => Some(Side::B),
        _ => None,
    }
}

/// Scoreboard players left on the page, if they read cleanly. Roster size is
/// not enforced and recap data is never attached.
fn residual_players(
    snapshot: &PageSnapshot,
    ctx: &PageContext<'_>,
) -> (Vec<PlayerStatRecord>, Vec<PlayerStatRecord>) {
    let read = || -> Result<_, ExtractError> {
        let [block_a, block_b] = team_blocks(snapshot, ctx)?;
        let rows_a = read_rows(&block_a, Side::A, ctx)?;
        let rows_b = read_rows(&block_b, Side::B, ctx)?;
        ensure_unique_ids(&rows_a, &rows_b, ctx)?;
        Ok((rows_a, rows_b))
    };

    match read() {
        Ok((rows_a, rows_b)) => (
            rows_a.into_iter().map(|r| r.into_player(None)).collect(),
            rows_b.into_iter().map(|r| r.into_player(None)).collect(),
        ),
        Err(ExtractError::MissingLandmark { .. }) => (Vec::new(), Vec::new()),
        Err(err) => {
            tracing::warn!(
                match_id = %ctx.match_id,
                error = %err,
                "forfeit page has unreadable player rows; keeping empty rosters"
            );
            (Vec::new(), Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use esea_core::{PageVariant, Side};

    use super::parse_forfeit_side;
    use crate::error::{ExtractError, ExtractErrorKind};
    use crate::extract::extract;
    use crate::extract::testing::{page, PageBuilder};

    #[test]
    fn forfeiting_side_scores_zero() {
        let (snapshot, landmarks) = page(PageBuilder::forfeit("2"));
        let rec = extract(&snapshot, PageVariant::Forfeit, &landmarks).unwrap();
        assert_eq!(rec.variant, PageVariant::Forfeit);
        assert_eq!((rec.team_a.score, rec.team_b.score), (16, 0));
        assert_eq!(rec.winner(), Some(Side::A));
    }

    #[test]
    fn side_a_forfeit_by_letter() {
        let (snapshot, landmarks) = page(PageBuilder::forfeit("a"));
        let rec = extract(&snapshot, PageVariant::Forfeit, &landmarks).unwrap();
        assert_eq!((rec.team_a.score, rec.team_b.score), (0, 16));
    }

    #[test]
    fn residual_scoreboard_players_are_kept_without_recap() {
        let mut builder = PageBuilder::forfeit("1");
        builder.rows_b.truncate(3);
        let (snapshot, landmarks) = page(builder);
        let rec = extract(&snapshot, PageVariant::Forfeit, &landmarks).unwrap();
        assert_eq!(rec.team_a.players.len(), 5);
        assert_eq!(rec.team_b.players.len(), 3);
        assert!(rec.players().all(|(_, p)| p.recap.is_none()));
    }

    #[test]
    fn banner_alone_yields_empty_rosters() {
        let mut builder = PageBuilder::forfeit("B");
        builder.scoreboard = false;
        let (snapshot, landmarks) = page(builder);
        let rec = extract(&snapshot, PageVariant::Forfeit, &landmarks).unwrap();
        assert_eq!((rec.team_a.score, rec.team_b.score), (16, 0));
        assert!(rec.team_a.players.is_empty());
        assert!(rec.team_b.players.is_empty());
    }

    #[test]
    fn unreadable_rows_are_dropped_not_fatal() {
        let mut builder = PageBuilder::forfeit("2");
        builder.rows_a[0].kills = "?".to_string();
        let (snapshot, landmarks) = page(builder);
        let rec = extract(&snapshot, PageVariant::Forfeit, &landmarks).unwrap();
        assert_eq!(rec.players().count(), 0);
    }

    #[test]
    fn unknown_marker_is_structure_error() {
        let (snapshot, landmarks) = page(PageBuilder::forfeit("both"));
        let err = extract(&snapshot, PageVariant::Forfeit, &landmarks).unwrap_err();
        assert!(
            matches!(err, ExtractError::ForfeitSide { ref raw, .. } if raw == "both"),
            "got: {err:?}"
        );
        assert_eq!(err.kind(), ExtractErrorKind::Structure);
    }

    #[test]
    fn missing_banner_is_structure_error() {
        let (snapshot, landmarks) = page(PageBuilder::base(16, 3));
        let err = extract(&snapshot, PageVariant::Forfeit, &landmarks).unwrap_err();
        assert!(
            matches!(err, ExtractError::MissingLandmark { landmark: "forfeit_banner", .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn marker_parsing() {
        assert_eq!(parse_forfeit_side(" 1 "), Some(Side::A));
        assert_eq!(parse_forfeit_side("B"), Some(Side::B));
        assert_eq!(parse_forfeit_side(""), None);
        assert_eq!(parse_forfeit_side("3"), None);
    }
}
