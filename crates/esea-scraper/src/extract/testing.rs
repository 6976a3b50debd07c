//! Builds synthetic match pages in the default landmark layout.

use std::fmt::Write as _;

use esea_core::MatchId;

use crate::landmarks::CompiledLandmarks;
use crate::snapshot::PageSnapshot;

#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub name: String,
    pub href: Option<String>,
    pub rating: String,
    pub kills: String,
    pub deaths: String,
    pub headshot: String,
    pub truncate_after_kills: bool,
}

impl Row {
    pub fn new(name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            href: Some(format!("/users/{id}")),
            rating: "10.00".to_string(),
            kills: "15".to_string(),
            deaths: "15".to_string(),
            headshot: "25.00".to_string(),
            truncate_after_kills: false,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecapRow {
    pub name: String,
    pub href: Option<String>,
    pub assists: String,
    pub adr: String,
    pub kast: String,
    pub first_kills: String,
}

impl RecapRow {
    pub fn new(name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            href: Some(format!("/users/{id}")),
            assists: "4".to_string(),
            adr: "81.3".to_string(),
            kast: "72.0".to_string(),
            first_kills: "2".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PageBuilder {
    pub scoreboard: bool,
    pub score_a: Option<String>,
    pub score_b: Option<String>,
    pub rows_a: Vec<Row>,
    pub rows_b: Vec<Row>,
    pub extra_team_block: bool,
    pub recap: Option<Vec<RecapRow>>,
    pub forfeit_banner: bool,
    pub forfeit_team: Option<String>,
}

impl PageBuilder {
    pub fn empty() -> Self {
        Self {
            scoreboard: false,
            score_a: None,
            score_b: None,
            rows_a: Vec::new(),
            rows_b: Vec::new(),
            extra_team_block: false,
            recap: None,
            forfeit_banner: false,
            forfeit_team: None,
        }
    }

    /// Full 5v5 scoreboard; side A ids are 100..=104, side B ids 200..=204.
    pub fn base(score_a: u32, score_b: u32) -> Self {
        Self {
            scoreboard: true,
            score_a: Some(score_a.to_string()),
            score_b: Some(score_b.to_string()),
            rows_a: (0..5)
                .map(|i| Row::new(&format!("a{i}"), &format!("{}", 100 + i)))
                .collect(),
            rows_b: (0..5)
                .map(|i| Row::new(&format!("b{i}"), &format!("{}", 200 + i)))
                .collect(),
            ..Self::empty()
        }
    }

    /// [`PageBuilder::base`] plus a recap row for every player, side B first
    /// so the join cannot lean on row order.
    pub fn extended(score_a: u32, score_b: u32) -> Self {
        let mut builder = Self::base(score_a, score_b);
        let recap = builder
            .rows_b
            .iter()
            .chain(&builder.rows_a)
            .map(|r| {
                let id = r
                    .href
                    .as_deref()
                    .and_then(|h| h.strip_prefix("/users/"))
                    .unwrap_or_default();
                RecapRow::new(&r.name, id)
            })
            .collect();
        builder.recap = Some(recap);
        builder
    }

    pub fn forfeit(team: &str) -> Self {
        Self {
            forfeit_banner: true,
            forfeit_team: Some(team.to_string()),
            ..Self::base(0, 0)
        }
    }

    pub fn render(&self) -> String {
        let mut html = String::from("<!DOCTYPE html><html><head><title>Match</title></head><body>");
        if self.forfeit_banner {
            html.push_str("<div class=\"match-forfeit\"");
            if let Some(team) = &self.forfeit_team {
                let _ = write!(html, " data-forfeit-team=\"{team}\"");
            }
            html.push_str(">This match was forfeited.</div>");
        }
        if self.scoreboard {
            html.push_str("<div id=\"match-stats\">");
            render_team(&mut html, self.score_a.as_deref(), &self.rows_a);
            render_team(&mut html, self.score_b.as_deref(), &self.rows_b);
            if self.extra_team_block {
                render_team(&mut html, Some("0"), &[]);
            }
            html.push_str("</div>");
        }
        if let Some(recap) = &self.recap {
            html.push_str("<div id=\"match-recap\"><table><tbody>");
            for row in recap {
                html.push_str("<tr class=\"recap-row\">");
                render_player_cell(&mut html, &row.name, row.href.as_deref());
                let _ = write!(
                    html,
                    "<td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    row.assists, row.adr, row.kast, row.first_kills
                );
            }
            html.push_str("</tbody></table></div>");
        }
        html.push_str("</body></html>");
        html
    }
}

fn render_team(html: &mut String, score: Option<&str>, rows: &[Row]) {
    html.push_str("<div class=\"team-block\"><div class=\"team-header\">");
    if let Some(score) = score {
        let _ = write!(html, "<span class=\"team-score\">{score}</span>");
    }
    html.push_str("</div><table><tbody>");
    for row in rows {
        html.push_str("<tr class=\"player-row\">");
        render_player_cell(html, &row.name, row.href.as_deref());
        let _ = write!(html, "<td>{}</td><td>{}</td>", row.rating, row.kills);
        if !row.truncate_after_kills {
            let _ = write!(html, "<td>{}</td><td>{}</td>", row.deaths, row.headshot);
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
}

fn render_player_cell(html: &mut String, name: &str, href: Option<&str>) {
    match href {
        Some(href) => {
            let _ = write!(html, "<td class=\"player\"><a href=\"{href}\">{name}</a></td>");
        }
        None => {
            let _ = write!(html, "<td class=\"player\"><span>{name}</span></td>");
        }
    }
}

pub(crate) fn page(builder: PageBuilder) -> (PageSnapshot, CompiledLandmarks) {
    let landmarks = CompiledLandmarks::defaults().expect("default landmarks compile");
    let match_id = MatchId::new(1).expect("non-zero");
    (PageSnapshot::parse(match_id, &builder.render()), landmarks)
}
