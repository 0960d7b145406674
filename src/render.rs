use crate::html::escape;
use crate::types::{League, LeagueSummary, Match, PlayerStats, Season, TeamStats, TopTeams};

/// Page elements the dashboard writes into. The surrounding markup owns these
/// elements; a fragment produced here replaces the element's contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    SeasonSelect,
    LeaguesGrid,
    TopTeamsBody,
    TopPlayersBody,
    LeagueHeader,
    MatchesBody,
}

impl Target {
    pub fn selector(&self) -> &'static str {
        match self {
            Target::SeasonSelect => "#seasonSelect",
            Target::LeaguesGrid => "#leaguesGrid",
            Target::TopTeamsBody => "#topTeamsTable tbody",
            Target::TopPlayersBody => "#topPlayersTable tbody",
            Target::LeagueHeader => "#leagueHeader",
            Target::MatchesBody => "#matchesTable tbody",
        }
    }
}

/// One region rewrite: the fragment to swap into `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    pub target: Target,
    pub html: String,
}

impl Patch {
    pub fn new(target: Target, html: String) -> Self {
        Self { target, html }
    }
}

pub const TEAMS_COLSPAN: u8 = 5;
pub const PLAYERS_COLSPAN: u8 = 7;
pub const MATCHES_COLSPAN: u8 = 5;

const TEAM_BADGE_URL: &str = "https://media.api-sports.io/football/teams";

pub fn placeholder_row(colspan: u8) -> String {
    format!(r#"<tr><td colspan="{colspan}">No data available</td></tr>"#)
}

pub fn error_row(colspan: u8) -> String {
    format!(r#"<tr><td colspan="{colspan}">Error loading data</td></tr>"#)
}

/// Team averages: absent, null and a plain 0 all fall back to "0.00".
/// A real 0 is indistinguishable from a missing value on this table; that
/// ambiguity is inherited from the backend contract.
pub fn avg_or_zero(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{v:.2}"),
        _ => "0.00".to_string(),
    }
}

/// Player averages use "N/A" where the teams table uses "0.00". The two
/// tables ship with different fallbacks; keep them separate.
pub fn avg_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{v:.2}"),
        _ => "N/A".to_string(),
    }
}

fn name_or_na(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.is_empty() => escape(n),
        _ => "N/A".to_string(),
    }
}

fn badge_img(src: &str) -> String {
    format!(
        r#"<img src="{}" class="team-icon me-2" style="width: 24px; height: 24px;" onerror="this.style.display='none'">"#,
        escape(src)
    )
}

fn team_badge(team_id: u32) -> String {
    badge_img(&format!("{TEAM_BADGE_URL}/{team_id}.png"))
}

/// `<option>` list for the season selector, with the current season marked.
pub fn season_options(seasons: &[Season], selected: &str) -> String {
    seasons
        .iter()
        .map(|s| {
            let marker = if s.value == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(&s.value),
                marker,
                escape(&s.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn league_card(league: &League, season: &str) -> String {
    let name = escape(&league.name);
    format!(
        r#"<div class="col-6 col-md-2 mb-3"><div class="card h-100" style="cursor: pointer;" onclick="window.location.href='/league?id={id}&amp;season={season}'"><div class="d-flex justify-content-center align-items-center" style="height: 100px;"><img src="{icon}" class="card-img-top img-fluid" alt="{name}" style="max-height: 120px; max-width: 120px;"></div><div class="card-body text-center"><h6 class="card-title">{name}</h6><p class="card-text text-muted">{country}</p></div></div></div>"#,
        id = league.id,
        season = escape(season),
        icon = escape(&league.icon),
        name = name,
        country = escape(&league.country),
    )
}

/// One clickable card per league. The card's link captures the season current
/// at render time; later season changes do not rewrite existing cards.
pub fn league_cards(leagues: &[League], season: &str) -> String {
    leagues
        .iter()
        .map(|l| league_card(l, season))
        .collect::<Vec<_>>()
        .join("\n")
}

fn team_row(rank: usize, team: &TeamStats) -> String {
    format!(
        "<tr><td>{rank}</td><td>{badge}{name}</td><td>{points}</td><td>{goals_for}</td><td>{goals_against}</td></tr>",
        badge = team_badge(team.id),
        name = name_or_na(team.name.as_deref()),
        points = avg_or_zero(team.avg_points),
        goals_for = avg_or_zero(team.avg_goals_for),
        goals_against = avg_or_zero(team.avg_goals_against),
    )
}

/// Body of the top-teams ranking table. Rows keep backend order; the rank
/// column is just the 1-indexed position.
pub fn top_teams_body(response: &TopTeams) -> String {
    let teams = response.teams.as_deref().unwrap_or_default();
    if teams.is_empty() {
        return placeholder_row(TEAMS_COLSPAN);
    }
    teams
        .iter()
        .enumerate()
        .map(|(i, t)| team_row(i + 1, t))
        .collect::<Vec<_>>()
        .join("\n")
}

fn player_row(rank: usize, player: &PlayerStats) -> String {
    format!(
        "<tr><td>{rank}</td><td>{badge}{name}</td><td>{points}</td><td>{goals}</td><td>{assists}</td><td>{avg_points}</td><td>{avg_goal}</td></tr>",
        badge = team_badge(player.team_id),
        name = escape(&player.name),
        points = player.total_points,
        goals = player.total_goals,
        assists = player.total_assists,
        avg_points = avg_or_na(player.avg_points),
        avg_goal = avg_or_na(player.avg_goal),
    )
}

/// Body of the top-players ranking table: raw totals, "N/A" averages.
pub fn top_players_body(players: &[PlayerStats]) -> String {
    if players.is_empty() {
        return placeholder_row(PLAYERS_COLSPAN);
    }
    players
        .iter()
        .enumerate()
        .map(|(i, p)| player_row(i + 1, p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Heading fragment for the league detail page.
pub fn league_heading(league: &LeagueSummary) -> String {
    format!(
        r#"<img src="{}" class="league-icon me-2" style="width: 48px; height: 48px;" onerror="this.style.display='none'">{}"#,
        escape(&league.icon),
        escape(&league.name)
    )
}

fn match_row(m: &Match) -> String {
    format!(
        "<tr><td>{date}</td><td>{time}</td><td>{home_badge}{home}</td><td>{home_score} : {away_score}</td><td>{away_badge}{away}</td></tr>",
        date = escape(&m.date),
        time = escape(&m.time),
        home_badge = badge_img(&m.home_icon),
        home = escape(&m.home_team),
        home_score = m.home_score,
        away_score = m.away_score,
        away_badge = badge_img(&m.away_icon),
        away = escape(&m.away_team),
    )
}

/// Body of the league match list (date, time, home, score, away).
pub fn matches_body(matches: &[Match]) -> String {
    if matches.is_empty() {
        return placeholder_row(MATCHES_COLSPAN);
    }
    matches.iter().map(match_row).collect::<Vec<_>>().join("\n")
}
