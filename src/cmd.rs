use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

use crate::api_client::StatsApiClient;
use crate::client::StatsApi;
use crate::dashboard::Dashboard;
use crate::render::{self, Patch, Target};

#[derive(Parser, Debug)]
#[command(
    name = "matchboard",
    about = "Renders a football-stats dashboard as HTML fragments"
)]
pub struct Args {
    /// Base URL of the stats backend; defaults to MATCHBOARD_API_URL
    #[arg(long)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Load every widget and print its fragment
    Dashboard {
        /// Apply one season change after the initial load
        #[arg(long)]
        season: Option<String>,
        /// Keep reading season keys from stdin, one per line, re-rendering
        /// the top-teams fragment for each
        #[arg(long)]
        interactive: bool,
    },
    /// Print the season selector options
    Seasons,
    /// Print the league cards
    Leagues {
        /// Season key embedded in the card links
        #[arg(long)]
        season: Option<String>,
    },
    /// Print the top-teams table body
    TopTeams {
        #[arg(long)]
        season: Option<String>,
    },
    /// Print the top-players table body
    TopPlayers {
        #[arg(long)]
        season: Option<String>,
    },
    /// Print a league's match list
    Matches {
        #[arg(long)]
        league: u32,
        #[arg(long)]
        season: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

/// Each fragment is printed under a comment naming the page element it
/// belongs to, so the embedding side knows where to swap it in.
fn print_patch(patch: &Patch) {
    println!("<!-- {} -->", patch.target.selector());
    println!("{}", patch.html);
    println!();
}

/// Ranking fetches need a season key. Use the explicit one when given,
/// otherwise adopt the backend's first season the way the dashboard does on
/// load; an empty key is the degraded fallback.
async fn resolve_season<C: StatsApi>(client: &C, season: Option<String>) -> String {
    match season {
        Some(key) => key,
        None => match client.seasons().await {
            Ok(seasons) => seasons
                .first()
                .map(|s| s.value.clone())
                .unwrap_or_default(),
            Err(e) => {
                error!("failed to load seasons: {e}");
                String::new()
            }
        },
    }
}

impl Args {
    pub async fn run(self) -> anyhow::Result<()> {
        let client = match self.api_url {
            Some(url) => StatsApiClient::with_base_url(url),
            None => StatsApiClient::new()?,
        };
        self.cmd.run(client).await
    }
}

impl Cmd {
    async fn run(self, client: StatsApiClient) -> anyhow::Result<()> {
        match self {
            Cmd::Dashboard {
                season,
                interactive,
            } => {
                let mut dash = Dashboard::new(client);
                for patch in dash.load().await {
                    print_patch(&patch);
                }
                if let Some(key) = season {
                    if let Some(patch) = dash.season_changed(key).await {
                        print_patch(&patch);
                    }
                }
                if interactive {
                    let mut lines = BufReader::new(tokio::io::stdin()).lines();
                    while let Some(line) = lines.next_line().await? {
                        let key = line.trim();
                        if key.is_empty() {
                            continue;
                        }
                        if let Some(patch) = dash.season_changed(key).await {
                            print_patch(&patch);
                        }
                    }
                }
            }
            Cmd::Seasons => {
                let seasons = client.seasons().await?;
                let selected = seasons
                    .first()
                    .map(|s| s.value.clone())
                    .unwrap_or_default();
                print_patch(&Patch::new(
                    Target::SeasonSelect,
                    render::season_options(&seasons, &selected),
                ));
            }
            Cmd::Leagues { season } => {
                let season = resolve_season(&client, season).await;
                let leagues = client.leagues().await?;
                print_patch(&Patch::new(
                    Target::LeaguesGrid,
                    render::league_cards(&leagues, &season),
                ));
            }
            Cmd::TopTeams { season } => {
                let season = resolve_season(&client, season).await;
                let top = client.top_teams(&season).await?;
                print_patch(&Patch::new(
                    Target::TopTeamsBody,
                    render::top_teams_body(&top),
                ));
            }
            Cmd::TopPlayers { season } => {
                let season = resolve_season(&client, season).await;
                let players = client.top_players(&season).await?;
                print_patch(&Patch::new(
                    Target::TopPlayersBody,
                    render::top_players_body(&players),
                ));
            }
            Cmd::Matches {
                league,
                season,
                page,
                limit,
            } => {
                let season = resolve_season(&client, season).await;
                match client.league_matches(league, &season, page, limit).await {
                    Ok(rsp) => {
                        print_patch(&Patch::new(
                            Target::LeagueHeader,
                            render::league_heading(&rsp.league),
                        ));
                        print_patch(&Patch::new(
                            Target::MatchesBody,
                            render::matches_body(rsp.matches.as_deref().unwrap_or_default()),
                        ));
                    }
                    // the header is left alone; only the table reports
                    Err(e) => {
                        error!("failed to load matches: {e}");
                        print_patch(&Patch::new(
                            Target::MatchesBody,
                            render::error_row(render::MATCHES_COLSPAN),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
