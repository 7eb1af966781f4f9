use crate::client::{LoadError, LoadResult, NhlApi};
use crate::{Game, Schedule, dates};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, warn};
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// date, home_team, away_team, time_utc, arena, read by position.
const FIELD_COUNT: usize = 5;

/// Where the schedule CSV lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSource {
    File(PathBuf),
    Url(String),
}

impl ScheduleSource {
    /// `http://` and `https://` select a URL, anything else is a file path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            ScheduleSource::Url(s.to_owned())
        } else {
            ScheduleSource::File(PathBuf::from(s))
        }
    }

    pub async fn load(&self) -> LoadResult<Schedule> {
        let games = match self {
            ScheduleSource::File(path) => load_file(path)?,
            ScheduleSource::Url(url) => load_url(&NhlApi::new(), url).await?,
        };
        Ok(Schedule::new(games))
    }
}

impl fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleSource::File(path) => write!(f, "{}", path.display()),
            ScheduleSource::Url(url) => f.write_str(url),
        }
    }
}

pub fn load_file(path: &Path) -> LoadResult<Vec<Game>> {
    let name = path.display().to_string();
    debug!("reading schedule from {name}");
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io(e, name.clone()))?;
    parse_schedule(&text, &name)
}

pub async fn load_url(api: &NhlApi, url: &str) -> LoadResult<Vec<Game>> {
    let text = api.fetch_csv(url).await?;
    parse_schedule(&text, url)
}

/// Parse schedule CSV text into games, in source order.
///
/// The first non-blank line is a header and is skipped. Each line is its own
/// record: quoted fields may contain commas but never newlines, so a broken
/// quote costs only its own line. Rows that are short, carry an unparseable
/// date or timestamp, or pit a team against itself are skipped; repeated
/// (date, home, away) rows keep only the first occurrence. `source` only
/// labels log lines.
pub fn parse_schedule(text: &str, source: &str) -> LoadResult<Vec<Game>> {
    let mut games = Vec::new();
    let mut seen = HashSet::new();

    let rows = text
        .lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .skip(1);

    for (idx, raw) in rows {
        let line = idx as u64 + 1;
        let Some(record) = read_line(raw, source, line) else {
            continue;
        };
        let Some(game) = parse_record(&record, source, line) else {
            continue;
        };

        let (date, home, away) = game.identity();
        if !seen.insert((date, home.to_owned(), away.to_owned())) {
            debug!(
                "{source}: dropping duplicate {} vs {} on {}",
                game.home_team, game.away_team, game.date
            );
            continue;
        }
        games.push(game);
    }

    debug!("{source}: loaded {} games", games.len());
    Ok(games)
}

/// Split one line into trimmed fields, honouring double-quote escaping.
fn read_line(raw: &str, source: &str, line: u64) -> Option<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Some(record),
        Ok(false) => None,
        Err(e) => {
            warn!("{source}: skipping unreadable line {line}: {e}");
            None
        }
    }
}

fn parse_record(record: &StringRecord, source: &str, line: u64) -> Option<Game> {
    if record.len() < FIELD_COUNT {
        debug!("{source}: line {line} has {} fields, skipping", record.len());
        return None;
    }
    let field = |idx: usize| record.get(idx).unwrap_or_default();

    let Some(date) = dates::parse_date(field(0)) else {
        warn!("{source}: line {line} has invalid date {:?}", field(0));
        return None;
    };
    let Some(time_utc) = dates::parse_timestamp(field(3)) else {
        warn!("{source}: line {line} has invalid time {:?}", field(3));
        return None;
    };

    let (home_team, away_team) = (field(1), field(2));
    if home_team.is_empty() || away_team.is_empty() {
        warn!("{source}: line {line} is missing a team");
        return None;
    }
    if home_team == away_team {
        warn!("{source}: line {line} lists {home_team} against itself");
        return None;
    }

    Some(Game {
        date,
        home_team: home_team.to_owned(),
        away_team: away_team.to_owned(),
        time_utc,
        arena: field(4).to_owned(),
    })
}

/// Write games as schedule CSV with the canonical header.
pub fn write_schedule<W: Write>(games: &[Game], out: W) -> LoadResult<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
    for game in games {
        writer
            .serialize(game)
            .map_err(|e| LoadError::Csv(e, "output".into()))?;
    }
    writer
        .flush()
        .map_err(|e| LoadError::Io(e, "output".into()))
}

pub fn write_schedule_file(games: &[Game], path: &Path) -> LoadResult<()> {
    let name = path.display().to_string();
    let file = std::fs::File::create(path).map_err(|e| LoadError::Io(e, name))?;
    write_schedule(games, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{date, game};

    const HEADER: &str = "date,home_team,away_team,time_utc,arena";

    fn parse(rows: &[&str]) -> Vec<Game> {
        let text = std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        parse_schedule(&text, "test.csv").expect("parses")
    }

    #[test]
    fn parses_rows_in_source_order() {
        let games = parse(&[
            "2025-10-20,TeamA,TeamC,2025-10-20T23:00:00Z,ArenaY",
            "2025-10-13,TeamA,TeamB,2025-10-13T23:00:00Z,ArenaX",
        ]);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].date, date("2025-10-20"));
        assert_eq!(
            games[1],
            game("2025-10-13", "TeamA", "TeamB", "2025-10-13T23:00:00Z").with_arena("ArenaX")
        );
    }

    #[test]
    fn quoted_commas_stay_in_one_field() {
        let games = parse(&[
            r#"2025-10-13,"Washington, D.C. Capitals",TeamB,2025-10-13T23:00:00Z,"Capital One Arena, DC""#,
        ]);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team, "Washington, D.C. Capitals");
        assert_eq!(games[0].arena, "Capital One Arena, DC");
    }

    #[test]
    fn short_and_blank_rows_are_dropped() {
        let games = parse(&[
            "2025-10-13,TeamA,TeamB,2025-10-13T23:00:00Z",
            "",
            "   ",
            "2025-10-14,TeamC,TeamD,2025-10-14T23:00:00Z,ArenaZ",
        ]);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team, "TeamC");
    }

    #[test]
    fn malformed_values_skip_only_their_row() {
        let games = parse(&[
            "13/10/2025,TeamA,TeamB,2025-10-13T23:00:00Z,ArenaX",
            "2025-10-13,TeamA,TeamB,seven pm,ArenaX",
            "2025-10-13,TeamA,TeamA,2025-10-13T23:00:00Z,ArenaX",
            "2025-10-13,,TeamB,2025-10-13T23:00:00Z,ArenaX",
            "2025-10-15,TeamE,TeamF,2025-10-15T23:30:00Z,ArenaW",
        ]);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team, "TeamE");
    }

    #[test]
    fn unterminated_quote_costs_only_its_own_line() {
        let games = parse(&[
            r#"2025-10-13,"TeamA,TeamB,2025-10-13T23:00:00Z,ArenaX"#,
            "2025-10-14,TeamC,TeamD,2025-10-14T23:00:00Z,ArenaZ",
            "2025-10-15,TeamE,TeamF,2025-10-15T23:30:00Z,ArenaW",
        ]);
        let homes: Vec<_> = games.iter().map(|g| g.home_team.as_str()).collect();
        assert_eq!(homes, vec!["TeamC", "TeamE"]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let text = format!("{HEADER}\r\n2025-10-13,TeamA,TeamB,2025-10-13T23:00:00Z,ArenaX\r\n");
        let games = parse_schedule(&text, "windows.csv").unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].arena, "ArenaX");
    }

    #[test]
    fn extra_fields_and_padding_are_tolerated() {
        let games = parse(&[" 2025-10-13 , TeamA , TeamB , 2025-10-13T23:00:00Z , ArenaX , extra"]);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].away_team, "TeamB");
        assert_eq!(games[0].arena, "ArenaX");
    }

    #[test]
    fn duplicate_games_keep_first_row() {
        let games = parse(&[
            "2025-10-13,TeamA,TeamB,2025-10-13T23:00:00Z,ArenaX",
            "2025-10-13,TeamA,TeamB,2025-10-13T23:30:00Z,ArenaX",
            "2025-10-13,TeamB,TeamA,2025-10-13T23:00:00Z,ArenaY",
        ]);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].time_utc, dates::parse_timestamp("2025-10-13T23:00:00Z").unwrap());
        assert_eq!(games[1].home_team, "TeamB");
    }

    #[test]
    fn header_only_and_empty_text_yield_no_games() {
        assert!(parse(&[]).is_empty());
        assert!(parse_schedule("", "empty.csv").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_file(Path::new("/definitely/not/here/nhl.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(..)));
        assert!(err.to_string().contains("/definitely/not/here/nhl.csv"));
    }

    #[test]
    fn written_csv_reads_back() {
        let games = vec![
            game("2025-10-13", "Washington, D.C.", "TeamB", "2025-10-13T23:00:00Z"),
            game("2025-10-19", "TeamC", "TeamD", "2025-10-19T17:00:00Z"),
        ];
        let mut out = Vec::new();
        write_schedule(&games, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(HEADER));
        assert!(text.contains("\"Washington, D.C.\""));
        assert_eq!(parse_schedule(&text, "roundtrip").unwrap(), games);
    }

    #[test]
    fn source_parse_distinguishes_urls_and_paths() {
        assert_eq!(
            ScheduleSource::parse("https://example.com/nhl.csv"),
            ScheduleSource::Url("https://example.com/nhl.csv".into())
        );
        assert_eq!(
            ScheduleSource::parse(" data/nhl.csv "),
            ScheduleSource::File(PathBuf::from("data/nhl.csv"))
        );
    }

    #[tokio::test]
    async fn url_source_parses_downloaded_csv() {
        let mut server = mockito::Server::new_async().await;
        let body = format!("{HEADER}\n2025-10-13,TeamA,TeamB,2025-10-13T23:00:00Z,ArenaX\n");
        let csv = server
            .mock("GET", "/nhl.csv")
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body(body)
            .create_async()
            .await;

        let url = format!("{}/nhl.csv", server.url());
        let games = load_url(&NhlApi::new(), &url).await.expect("loads");
        csv.assert_async().await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].arena, "ArenaX");
    }

    impl Game {
        fn with_arena(mut self, arena: &str) -> Self {
            self.arena = arena.into();
            self
        }
    }
}
