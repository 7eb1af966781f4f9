use crate::nhle::{NhleGame, ScheduleResponse};
use crate::{Game, dates};
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

pub type LoadResult<T> = Result<T, LoadError>;

const NHLE_WEB_V1: &str = "https://api-web.nhle.com/v1";

/// HTTP client for schedule sources: CSV published at a URL, and the NHL web
/// API used to build that CSV in the first place.
#[derive(Debug, Clone)]
pub struct NhlApi {
    client: Client,
    timeout: Duration,
    base_url: String,
    page_delay: Duration,
}

impl Default for NhlApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("nhltui/0.1 (terminal schedule viewer)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            base_url: NHLE_WEB_V1.to_owned(),
            page_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error, String),
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(String, String),
    Csv(csv::Error, String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e, path) => write!(f, "Could not read {path}: {e}"),
            LoadError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            LoadError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            LoadError::Parsing(msg, source) => write!(f, "Parse error for {source}: {msg}"),
            LoadError::Csv(e, source) => write!(f, "CSV error in {source}: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e, _) => Some(e),
            LoadError::Network(e, _) | LoadError::Api(e, _) => Some(e),
            LoadError::Csv(e, _) => Some(e),
            LoadError::Parsing(..) => None,
        }
    }
}

impl NhlApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host (a mirror, or a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Download a schedule CSV as text. Any non-success status is a load failure.
    pub async fn fetch_csv(&self, url: &str) -> LoadResult<String> {
        debug!("fetching schedule csv from {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LoadError::Network(e, url.to_owned()))?
            .error_for_status()
            .map_err(|e| LoadError::Api(e, url.to_owned()))?;

        response
            .text()
            .await
            .map_err(|e| LoadError::Network(e, url.to_owned()))
    }

    /// Fetch the one-week schedule page that starts on `date`.
    pub async fn fetch_schedule_page(&self, date: NaiveDate) -> LoadResult<ScheduleResponse> {
        let url = format!("{}/schedule/{}", self.base_url, dates::format_date(date));
        self.get(&url).await
    }

    /// Walk the weekly pages from `start` until `end`, following `nextStartDate`.
    ///
    /// Stops when the API has no next page, the next page starts after `end`,
    /// or the cursor fails to advance. Games outside `start..=end` are dropped.
    pub async fn fetch_season(&self, start: NaiveDate, end: NaiveDate) -> LoadResult<Vec<Game>> {
        let mut games = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(start);

        while let Some(date) = cursor.filter(|d| *d <= end) {
            debug!("fetching schedule for week starting {date}");
            let page = self.fetch_schedule_page(date).await?;

            for game in map_schedule_page(&page, start, end) {
                let key = (game.date, game.home_team.clone(), game.away_team.clone());
                if seen.insert(key) {
                    games.push(game);
                }
            }

            cursor = page
                .next_start_date
                .as_deref()
                .and_then(dates::parse_date)
                .filter(|next| *next > date);

            if cursor.is_some_and(|next| next <= end) && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        debug!("downloaded {} games between {start} and {end}", games.len());
        Ok(games)
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> LoadResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LoadError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| LoadError::Parsing(e.to_string(), url.to_owned())),
            Err(e) => {
                // A 4xx past the end of the season just means "no more weeks".
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(LoadError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: NHL web API wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_schedule_page(page: &ScheduleResponse, start: NaiveDate, end: NaiveDate) -> Vec<Game> {
    page.game_week
        .iter()
        .filter_map(|day| {
            let date = dates::parse_date(&day.date)?;
            (start..=end).contains(&date).then_some((date, day))
        })
        .flat_map(|(date, day)| day.games.iter().filter_map(move |g| map_game(date, g)))
        .collect()
}

fn map_game(date: NaiveDate, g: &NhleGame) -> Option<Game> {
    let home_team = g.home_team.as_ref().and_then(|t| t.full_name());
    let away_team = g.away_team.as_ref().and_then(|t| t.full_name());
    let time_utc = g.start_time_utc.as_deref().and_then(dates::parse_timestamp);

    let (Some(home_team), Some(away_team), Some(time_utc)) = (home_team, away_team, time_utc) else {
        warn!("skipping incomplete game {:?} on {date}", g.id);
        return None;
    };

    Some(Game {
        date,
        home_team,
        away_team,
        time_utc,
        arena: g.venue.as_ref().map(|v| v.default.clone()).unwrap_or_default(),
    })
}
