use async_trait::async_trait;

use crate::error::Error;
use crate::types::{League, LeagueMatches, PlayerStats, Season, TopTeams};

/// Read side of the stats backend. The dashboard controller talks to this
/// trait so tests can script responses without a server.
#[async_trait]
pub trait StatsApi {
    async fn seasons(&self) -> Result<Vec<Season>, Error>;
    async fn leagues(&self) -> Result<Vec<League>, Error>;
    async fn top_teams(&self, season: &str) -> Result<TopTeams, Error>;
    async fn top_players(&self, season: &str) -> Result<Vec<PlayerStats>, Error>;
    async fn league_matches(
        &self,
        league_id: u32,
        season: &str,
        page: u32,
        limit: u32,
    ) -> Result<LeagueMatches, Error>;
}
