use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Season {
    /// Raw season key used in API calls, e.g. "2023".
    pub value: String,
    /// Display form, e.g. "2023/24".
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct League {
    pub id: u32,
    pub name: String,
    pub country: String,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TopTeams {
    // the backend omits or nulls the list when it has nothing to rank
    #[serde(default)]
    pub teams: Option<Vec<TeamStats>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TeamStats {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avg_points: Option<f64>,
    #[serde(default)]
    pub avg_goals_for: Option<f64>,
    #[serde(default)]
    pub avg_goals_against: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlayerStats {
    pub team_id: u32,
    pub name: String,
    pub total_points: i64,
    pub total_goals: i64,
    pub total_assists: i64,
    #[serde(default)]
    pub avg_points: Option<f64>,
    #[serde(default)]
    pub avg_goal: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LeagueMatches {
    pub league: LeagueSummary,
    // an empty page arrives as null, not as an empty list
    #[serde(default)]
    pub matches: Option<Vec<Match>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LeagueSummary {
    /// Echoed back as a string (the backend reflects the query param),
    /// unlike the numeric ids in `/api/leagues`.
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Match {
    pub id: u32,
    pub date: String,
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i64,
    pub away_score: i64,
    pub home_icon: String,
    pub away_icon: String,
}
