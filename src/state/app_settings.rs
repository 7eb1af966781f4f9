use chrono::NaiveDate;
use log::LevelFilter;
use nhl_schedule::{ScheduleSource, dates};
use std::path::PathBuf;

/// The only environment knob: where the schedule CSV lives (path or URL).
pub const SCHEDULE_ENV: &str = "NHLTUI_SCHEDULE";
pub const DEFAULT_SCHEDULE: &str = "nhl-schedule-2025-2026.csv";
pub const DEFAULT_SEASON_START: &str = "2025-10-07";
pub const DEFAULT_SEASON_END: &str = "2026-04-16";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Tui,
    Json { week: Option<String> },
    Download { out: PathBuf, from: NaiveDate, to: NaiveDate },
    Help,
    Version,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub source: ScheduleSource,
    pub mode: Mode,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            source: ScheduleSource::parse(DEFAULT_SCHEDULE),
            mode: Mode::Tui,
        }
    }
}

impl AppSettings {
    pub fn load() -> Result<Self, String> {
        Self::from_args(std::env::args().skip(1), std::env::var(SCHEDULE_ENV).ok())
    }

    /// `--schedule` beats `NHLTUI_SCHEDULE`, which beats the default file name.
    pub fn from_args<I>(args: I, env_source: Option<String>) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut settings = Self::default();
        if let Some(src) = env_source.filter(|s| !s.trim().is_empty()) {
            settings.source = ScheduleSource::parse(&src);
        }

        let mut json = false;
        let mut week = None;
        let mut download = None;
        let mut from = None;
        let mut to = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} needs a value"));
            match arg.as_str() {
                "-h" | "--help" => settings.mode = Mode::Help,
                "-V" | "--version" => settings.mode = Mode::Version,
                "-v" | "--verbose" => settings.log_level = Some(LevelFilter::Debug),
                "-f" | "--full-screen" => settings.full_screen = true,
                "--json" => json = true,
                "--schedule" => settings.source = ScheduleSource::parse(&value("--schedule")?),
                "--week" => week = Some(value("--week")?),
                "--download" => download = Some(PathBuf::from(value("--download")?)),
                "--from" => from = Some(parse_flag_date("--from", &value("--from")?)?),
                "--to" => to = Some(parse_flag_date("--to", &value("--to")?)?),
                other => return Err(format!("Unknown argument: {other}")),
            }
        }

        if matches!(settings.mode, Mode::Help | Mode::Version) {
            return Ok(settings);
        }
        if json && download.is_some() {
            return Err("--json and --download cannot be combined".into());
        }
        if week.is_some() && !json {
            return Err("--week only applies with --json".into());
        }
        if (from.is_some() || to.is_some()) && download.is_none() {
            return Err("--from/--to only apply with --download".into());
        }

        if json {
            settings.mode = Mode::Json { week };
        } else if let Some(out) = download {
            let from = from.unwrap_or_else(|| default_date(DEFAULT_SEASON_START));
            let to = to.unwrap_or_else(|| default_date(DEFAULT_SEASON_END));
            if from > to {
                return Err(format!("--from {from} is after --to {to}"));
            }
            settings.mode = Mode::Download { out, from, to };
        }
        Ok(settings)
    }
}

fn parse_flag_date(flag: &str, raw: &str) -> Result<NaiveDate, String> {
    dates::parse_date(raw).ok_or_else(|| format!("{flag} expects YYYY-MM-DD, got {raw:?}"))
}

fn default_date(raw: &str) -> NaiveDate {
    dates::parse_date(raw).unwrap_or_default()
}

pub fn usage_text() -> &'static str {
    "nhltui - NHL weekly schedule terminal UI

Usage:
  nhltui [--schedule <PATH|URL>] [--full-screen] [--verbose]
  nhltui --json [--week <YYYY-MM-DD>] [--schedule <PATH|URL>]
  nhltui --download <OUT.csv> [--from <YYYY-MM-DD>] [--to <YYYY-MM-DD>]
  nhltui --help
  nhltui --version

Environment:
  NHLTUI_SCHEDULE   Path or URL of the schedule CSV (default nhl-schedule-2025-2026.csv)"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<AppSettings, String> {
        AppSettings::from_args(args.iter().map(|s| s.to_string()), None)
    }

    #[test]
    fn no_args_starts_the_viewer_on_the_default_file() {
        let settings = parse(&[]).unwrap();
        assert_eq!(settings.mode, Mode::Tui);
        assert_eq!(settings.source, ScheduleSource::File(DEFAULT_SCHEDULE.into()));
        assert!(settings.log_level.is_none());
    }

    #[test]
    fn flag_overrides_env_source() {
        let env = Some("https://example.com/nhl.csv".to_string());
        let from_env = AppSettings::from_args(Vec::<String>::new(), env.clone()).unwrap();
        assert_eq!(from_env.source, ScheduleSource::Url("https://example.com/nhl.csv".into()));

        let args = vec!["--schedule".to_string(), "local.csv".to_string()];
        let from_flag = AppSettings::from_args(args, env).unwrap();
        assert_eq!(from_flag.source, ScheduleSource::File("local.csv".into()));
    }

    #[test]
    fn blank_env_source_is_ignored() {
        let settings = AppSettings::from_args(Vec::<String>::new(), Some("  ".into())).unwrap();
        assert_eq!(settings.source, ScheduleSource::File(DEFAULT_SCHEDULE.into()));
    }

    #[test]
    fn json_mode_takes_optional_week() {
        assert_eq!(parse(&["--json"]).unwrap().mode, Mode::Json { week: None });
        assert_eq!(
            parse(&["--json", "--week", "2025-10-13"]).unwrap().mode,
            Mode::Json { week: Some("2025-10-13".into()) }
        );
    }

    #[test]
    fn download_defaults_to_the_season_window() {
        let settings = parse(&["--download", "out.csv"]).unwrap();
        assert_eq!(
            settings.mode,
            Mode::Download {
                out: "out.csv".into(),
                from: default_date(DEFAULT_SEASON_START),
                to: default_date(DEFAULT_SEASON_END),
            }
        );
    }

    #[test]
    fn rejects_bad_combinations() {
        assert!(parse(&["--week", "2025-10-13"]).is_err());
        assert!(parse(&["--json", "--download", "x.csv"]).is_err());
        assert!(parse(&["--from", "2025-10-01"]).is_err());
        assert!(parse(&["--download", "x.csv", "--from", "2026-01-01", "--to", "2025-01-01"]).is_err());
        assert!(parse(&["--download", "x.csv", "--from", "soon"]).is_err());
        assert!(parse(&["--schedule"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }

    #[test]
    fn help_wins_over_other_flags() {
        assert_eq!(parse(&["--json", "--help"]).unwrap().mode, Mode::Help);
    }
}
