use tracing::{debug, error};

use crate::client::StatsApi;
use crate::error::Error;
use crate::render::{self, Patch, Target, PLAYERS_COLSPAN, TEAMS_COLSPAN};
use crate::types::{League, PlayerStats, TopTeams};

/// UI state the widgets share: the season key every ranking fetch uses.
/// Empty until a season list arrives, and stays empty when the backend
/// returns none (degraded but non-fatal).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub season: String,
}

/// One issued top-teams refresh. The season is snapshotted at issue time;
/// the token orders refreshes so a response that lost the race against a
/// newer one is discarded instead of overwriting it.
#[derive(Debug)]
pub struct TeamsTicket {
    season: String,
    token: u64,
}

/// Drives the four dashboard widgets against a stats backend and turns each
/// response into a patch for the page region that owns it. Every loader is
/// its own failure domain: one failing leaves the others untouched.
pub struct Dashboard<C> {
    client: C,
    state: UiState,
    teams_generation: u64,
}

impl<C: StatsApi> Dashboard<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: UiState::default(),
            teams_generation: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Initial page load. The season list is awaited first since it decides
    /// the key every ranking fetch uses; the three widget fetches then run
    /// together with no ordering between them.
    pub async fn load(&mut self) -> Vec<Patch> {
        let mut patches = Vec::with_capacity(4);

        if let Some(patch) = self.load_seasons().await {
            patches.push(patch);
        }

        let ticket = self.begin_top_teams();
        let (leagues, teams, players) = tokio::join!(
            self.client.leagues(),
            self.fetch_top_teams(&ticket),
            self.client.top_players(&self.state.season),
        );

        if let Some(patch) = self.apply_leagues(leagues) {
            patches.push(patch);
        }
        if let Some(patch) = self.finish_top_teams(ticket, teams) {
            patches.push(patch);
        }
        patches.push(apply_top_players(players));

        patches
    }

    /// Fetch the season list, adopt the first entry's key as the current
    /// season and render the selector options. On failure the selector is
    /// left untouched and the season key stays as it was.
    pub async fn load_seasons(&mut self) -> Option<Patch> {
        match self.client.seasons().await {
            Ok(seasons) => {
                self.state.season = seasons
                    .first()
                    .map(|s| s.value.clone())
                    .unwrap_or_default();
                Some(Patch::new(
                    Target::SeasonSelect,
                    render::season_options(&seasons, &self.state.season),
                ))
            }
            Err(e) => {
                error!("failed to load seasons: {e}");
                None
            }
        }
    }

    fn apply_leagues(&self, outcome: Result<Vec<League>, Error>) -> Option<Patch> {
        match outcome {
            Ok(leagues) => Some(Patch::new(
                Target::LeaguesGrid,
                render::league_cards(&leagues, &self.state.season),
            )),
            Err(e) => {
                // grid keeps whatever it showed before
                error!("failed to load leagues: {e}");
                None
            }
        }
    }

    /// Stamp a new refresh ticket. Every ticket issued earlier is stale from
    /// this point on.
    pub fn begin_top_teams(&mut self) -> TeamsTicket {
        self.teams_generation += 1;
        TeamsTicket {
            season: self.state.season.clone(),
            token: self.teams_generation,
        }
    }

    /// Run the fetch for a ticket. Takes `&self`, so a host may keep several
    /// refreshes in flight and let them resolve in any order.
    pub async fn fetch_top_teams(&self, ticket: &TeamsTicket) -> Result<TopTeams, Error> {
        self.client.top_teams(&ticket.season).await
    }

    /// Turn a finished refresh into a table-body patch, or drop it when a
    /// newer refresh was begun while this one was in flight. Success and
    /// failure rewrite the same region.
    pub fn finish_top_teams(
        &mut self,
        ticket: TeamsTicket,
        outcome: Result<TopTeams, Error>,
    ) -> Option<Patch> {
        if ticket.token != self.teams_generation {
            debug!(
                "discarding stale top-teams response for season {:?}",
                ticket.season
            );
            return None;
        }
        let html = match outcome {
            Ok(top) => render::top_teams_body(&top),
            Err(e) => {
                error!("failed to load top teams: {e}");
                render::error_row(TEAMS_COLSPAN)
            }
        };
        Some(Patch::new(Target::TopTeamsBody, html))
    }

    /// One sequential top-teams refresh for the current season.
    pub async fn refresh_top_teams(&mut self) -> Option<Patch> {
        let ticket = self.begin_top_teams();
        let outcome = self.fetch_top_teams(&ticket).await;
        self.finish_top_teams(ticket, outcome)
    }

    /// The season selector changed: adopt the key and refresh the teams
    /// ranking, and only that. League cards keep the links they were
    /// rendered with and the players table is not refetched.
    pub async fn season_changed(&mut self, key: impl Into<String>) -> Option<Patch> {
        self.state.season = key.into();
        self.refresh_top_teams().await
    }
}

fn apply_top_players(outcome: Result<Vec<PlayerStats>, Error>) -> Patch {
    let html = match outcome {
        Ok(players) => render::top_players_body(&players),
        Err(e) => {
            error!("failed to load top players: {e}");
            render::error_row(PLAYERS_COLSPAN)
        }
    };
    Patch::new(Target::TopPlayersBody, html)
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{Dashboard, Target};
    use crate::client::StatsApi;
    use crate::error::{Error, JsonError};
    use crate::types::{League, LeagueMatches, PlayerStats, Season, TeamStats, TopTeams};

    /// Scripted backend: every endpoint pops its next queued result and
    /// panics when called without one, so an unexpected fetch fails the test.
    #[derive(Default)]
    struct StubApi {
        seasons: Mutex<VecDeque<Result<Vec<Season>, Error>>>,
        leagues: Mutex<VecDeque<Result<Vec<League>, Error>>>,
        teams: Mutex<VecDeque<Result<TopTeams, Error>>>,
        players: Mutex<VecDeque<Result<Vec<PlayerStats>, Error>>>,
        requested_team_seasons: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StatsApi for StubApi {
        async fn seasons(&self) -> Result<Vec<Season>, Error> {
            self.seasons
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected seasons call")
        }

        async fn leagues(&self) -> Result<Vec<League>, Error> {
            self.leagues
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected leagues call")
        }

        async fn top_teams(&self, season: &str) -> Result<TopTeams, Error> {
            self.requested_team_seasons
                .lock()
                .unwrap()
                .push(season.to_string());
            self.teams
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected top-teams call")
        }

        async fn top_players(&self, _season: &str) -> Result<Vec<PlayerStats>, Error> {
            self.players
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected top-players call")
        }

        async fn league_matches(
            &self,
            _league_id: u32,
            _season: &str,
            _page: u32,
            _limit: u32,
        ) -> Result<LeagueMatches, Error> {
            panic!("the dashboard never fetches league matches")
        }
    }

    fn fetch_error() -> Error {
        let parse = serde_json::from_str::<Vec<Season>>("not json").unwrap_err();
        JsonError::new("http://stub/api", parse).into()
    }

    fn season(value: &str, label: &str) -> Season {
        Season {
            value: value.into(),
            label: label.into(),
        }
    }

    fn one_league() -> League {
        League {
            id: 39,
            name: "Premier League".into(),
            country: "England".into(),
            icon: "https://media.api-sports.io/football/leagues/39.png".into(),
        }
    }

    fn one_team() -> TeamStats {
        TeamStats {
            id: 50,
            name: Some("Manchester City".into()),
            avg_points: Some(2.37),
            avg_goals_for: Some(2.53),
            avg_goals_against: Some(0.89),
        }
    }

    fn one_player() -> PlayerStats {
        PlayerStats {
            team_id: 50,
            name: "Haaland, Erling".into(),
            total_points: 27,
            total_goals: 18,
            total_assists: 9,
            avg_points: Some(3.54),
            avg_goal: Some(5.31),
        }
    }

    fn stub_for_full_load() -> StubApi {
        let stub = StubApi::default();
        stub.seasons.lock().unwrap().push_back(Ok(vec![
            season("2023", "2023/24"),
            season("2022", "2022/23"),
        ]));
        stub.leagues.lock().unwrap().push_back(Ok(vec![one_league()]));
        stub.teams.lock().unwrap().push_back(Ok(TopTeams {
            teams: Some(vec![one_team()]),
        }));
        stub.players.lock().unwrap().push_back(Ok(vec![one_player()]));
        stub
    }

    #[tokio::test]
    async fn test_load_adopts_the_first_season_and_renders_all_widgets() {
        let mut dash = Dashboard::new(stub_for_full_load());

        let patches = dash.load().await;

        assert_eq!(dash.state().season, "2023");
        let targets: Vec<Target> = patches.iter().map(|p| p.target).collect();
        assert_eq!(
            targets,
            vec![
                Target::SeasonSelect,
                Target::LeaguesGrid,
                Target::TopTeamsBody,
                Target::TopPlayersBody,
            ]
        );
        assert!(patches[0].html.contains(r#"<option value="2023" selected>2023/24</option>"#));
        assert!(patches[0].html.contains(r#"<option value="2022">2022/23</option>"#));
        assert_eq!(
            *dash.client.requested_team_seasons.lock().unwrap(),
            vec!["2023".to_string()]
        );
    }

    #[tokio::test]
    async fn test_load_with_no_seasons_degrades_to_the_empty_key() {
        let stub = StubApi::default();
        stub.seasons.lock().unwrap().push_back(Ok(vec![]));
        stub.leagues.lock().unwrap().push_back(Ok(vec![]));
        stub.teams
            .lock()
            .unwrap()
            .push_back(Ok(TopTeams { teams: None }));
        stub.players.lock().unwrap().push_back(Ok(vec![]));
        let mut dash = Dashboard::new(stub);

        let patches = dash.load().await;

        assert_eq!(dash.state().season, "");
        // the selector is still patched, to an empty option list
        assert_eq!(patches[0].target, Target::SeasonSelect);
        assert_eq!(patches[0].html, "");
        assert_eq!(
            *dash.client.requested_team_seasons.lock().unwrap(),
            vec![String::new()]
        );
    }

    #[tokio::test]
    async fn test_season_fetch_failure_is_non_fatal() {
        let stub = StubApi::default();
        stub.seasons.lock().unwrap().push_back(Err(fetch_error()));
        stub.leagues.lock().unwrap().push_back(Ok(vec![one_league()]));
        stub.teams.lock().unwrap().push_back(Ok(TopTeams {
            teams: Some(vec![one_team()]),
        }));
        stub.players.lock().unwrap().push_back(Ok(vec![one_player()]));
        let mut dash = Dashboard::new(stub);

        let patches = dash.load().await;

        assert_eq!(dash.state().season, "");
        assert!(patches.iter().all(|p| p.target != Target::SeasonSelect));
        assert_eq!(patches.len(), 3);
    }

    #[tokio::test]
    async fn test_league_failure_leaves_the_grid_alone() {
        let stub = StubApi::default();
        stub.seasons
            .lock()
            .unwrap()
            .push_back(Ok(vec![season("2023", "2023/24")]));
        stub.leagues.lock().unwrap().push_back(Err(fetch_error()));
        stub.teams.lock().unwrap().push_back(Ok(TopTeams {
            teams: Some(vec![one_team()]),
        }));
        stub.players.lock().unwrap().push_back(Ok(vec![one_player()]));
        let mut dash = Dashboard::new(stub);

        let patches = dash.load().await;

        assert!(patches.iter().all(|p| p.target != Target::LeaguesGrid));
        assert!(patches.iter().any(|p| p.target == Target::TopTeamsBody));
        assert!(patches.iter().any(|p| p.target == Target::TopPlayersBody));
    }

    #[tokio::test]
    async fn test_ranking_failures_render_error_rows() {
        let stub = StubApi::default();
        stub.seasons
            .lock()
            .unwrap()
            .push_back(Ok(vec![season("2023", "2023/24")]));
        stub.leagues.lock().unwrap().push_back(Ok(vec![]));
        stub.teams.lock().unwrap().push_back(Err(fetch_error()));
        stub.players.lock().unwrap().push_back(Err(fetch_error()));
        let mut dash = Dashboard::new(stub);

        let patches = dash.load().await;

        let teams = patches
            .iter()
            .find(|p| p.target == Target::TopTeamsBody)
            .unwrap();
        assert_eq!(teams.html, r#"<tr><td colspan="5">Error loading data</td></tr>"#);
        let players = patches
            .iter()
            .find(|p| p.target == Target::TopPlayersBody)
            .unwrap();
        assert_eq!(
            players.html,
            r#"<tr><td colspan="7">Error loading data</td></tr>"#
        );
    }

    #[tokio::test]
    async fn test_empty_teams_render_the_placeholder_row() {
        let stub = StubApi::default();
        stub.teams
            .lock()
            .unwrap()
            .push_back(Ok(TopTeams { teams: Some(vec![]) }));
        let mut dash = Dashboard::new(stub);

        let patch = dash.refresh_top_teams().await.unwrap();

        assert_eq!(patch.target, Target::TopTeamsBody);
        assert_eq!(patch.html, r#"<tr><td colspan="5">No data available</td></tr>"#);
    }

    #[tokio::test]
    async fn test_season_change_refreshes_teams_and_nothing_else() {
        let mut dash = Dashboard::new(stub_for_full_load());
        dash.load().await;

        // only a top-teams response is queued; any other fetch would panic
        dash.client.teams.lock().unwrap().push_back(Ok(TopTeams {
            teams: Some(vec![one_team()]),
        }));
        let patch = dash.season_changed("2022").await.unwrap();

        assert_eq!(patch.target, Target::TopTeamsBody);
        assert_eq!(dash.state().season, "2022");
        assert_eq!(
            *dash.client.requested_team_seasons.lock().unwrap(),
            vec!["2023".to_string(), "2022".to_string()]
        );
    }

    #[tokio::test]
    async fn test_stale_refresh_is_discarded_in_both_completion_orders() {
        let stub = StubApi::default();
        let mut dash = Dashboard::new(stub);

        // two overlapping refreshes: the first becomes stale immediately
        let first = dash.begin_top_teams();
        let second = dash.begin_top_teams();

        let fresh = dash.finish_top_teams(
            second,
            Ok(TopTeams {
                teams: Some(vec![one_team()]),
            }),
        );
        assert!(fresh.is_some(), "the newest refresh must render");

        let stale = dash.finish_top_teams(first, Ok(TopTeams { teams: None }));
        assert!(stale.is_none(), "a stale refresh must be dropped");

        // same pair finishing in issue order: the older one still loses
        let third = dash.begin_top_teams();
        let fourth = dash.begin_top_teams();
        assert!(dash.finish_top_teams(third, Ok(TopTeams { teams: None })).is_none());
        assert!(dash
            .finish_top_teams(
                fourth,
                Ok(TopTeams {
                    teams: Some(vec![one_team()]),
                })
            )
            .is_some());
    }

    #[tokio::test]
    async fn test_stale_error_does_not_clobber_a_fresh_table() {
        let mut dash = Dashboard::new(StubApi::default());

        let old = dash.begin_top_teams();
        let new = dash.begin_top_teams();

        let fresh = dash.finish_top_teams(
            new,
            Ok(TopTeams {
                teams: Some(vec![one_team()]),
            }),
        );
        assert!(fresh.unwrap().html.contains("Manchester City"));

        // the older request failing afterwards must not paint an error row
        assert!(dash.finish_top_teams(old, Err(fetch_error())).is_none());
    }
}
