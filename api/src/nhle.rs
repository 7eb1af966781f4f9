/// Wire types for the NHL web schedule API.
/// Endpoint: https://api-web.nhle.com/v1/schedule/{YYYY-MM-DD}
/// Each response covers one week and points at the next one via `nextStartDate`.
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    #[serde(default)]
    pub game_week: Vec<GameDay>,
    pub next_start_date: Option<String>,
    pub previous_start_date: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameDay {
    pub date: String,
    #[serde(default)]
    pub games: Vec<NhleGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhleGame {
    pub id: Option<u64>,
    pub home_team: Option<NhleTeam>,
    pub away_team: Option<NhleTeam>,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: Option<String>,
    pub venue: Option<LocalizedName>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhleTeam {
    pub abbrev: Option<String>,
    pub place_name: Option<LocalizedName>,
    pub common_name: Option<LocalizedName>,
}

impl NhleTeam {
    /// "Boston" + "Bruins" → "Boston Bruins".
    pub fn full_name(&self) -> Option<String> {
        let place = self.place_name.as_ref().map(|n| n.default.trim())?;
        let common = self.common_name.as_ref().map(|n| n.default.trim())?;
        match (place.is_empty(), common.is_empty()) {
            (false, false) => Some(format!("{place} {common}")),
            (true, false) => Some(common.to_owned()),
            (false, true) => Some(place.to_owned()),
            (true, true) => None,
        }
    }
}

/// The API localizes display strings; `default` is the English form.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LocalizedName {
    #[serde(default)]
    pub default: String,
}
