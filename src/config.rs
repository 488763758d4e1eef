use chrono::{Duration, Local, NaiveDate};
use clap::Parser;

const DEFAULT_CLIPPINGS_PATH: &str = "/Volumes/Kindle/documents/My Clippings.txt";
const DEFAULT_DATABASE_PATH: &str = "./highlights.db";

#[derive(Parser, Debug)]
#[command(name = "kindle-highlights")]
#[command(about = "Import highlights from a Kindle \"My Clippings.txt\" file")]
pub struct CliArgs {
    /// Clippings file, or a directory searched for "My Clippings.txt"
    #[arg(short, long)]
    pub clippings_path: Option<String>,

    /// SQLite database the clippings are imported into
    #[arg(short, long)]
    pub database_path: Option<String>,

    /// Earliest "Added on" date to import (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest "Added on" date to import (YYYY-MM-DD), defaults to yesterday
    #[arg(long)]
    pub to: Option<String>,

    /// Import clippings added in the last N days instead of --from/--to
    #[arg(short, long)]
    pub last: Option<u32>,
}

/// Where the clippings come from, where they go, and which "Added on" dates to import.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub clippings_path: String,
    pub database_path: String,
    /// Inclusive range of "Added on" dates to keep; `None` imports every clipping.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    BadDate { flag: &'static str, value: String },
    FromAfterTo { from: NaiveDate, to: NaiveDate },
    LastWithRange,
    ToWithoutFrom,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::BadDate { flag, value } => {
                write!(f, "{} expects a date like 2024-01-31, got '{}'", flag, value)
            }
            ConfigError::FromAfterTo { from, to } => write!(
                f,
                "--from {} is after --to {}, no clipping could match",
                from, to
            ),
            ConfigError::LastWithRange => {
                write!(f, "--last already picks the import window, drop --from/--to")
            }
            ConfigError::ToWithoutFrom => {
                write!(f, "--to needs --from; leave both out to import every clipping")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let cli = CliArgs::parse();
        Self::from_args(cli, Local::now().date_naive())
    }

    fn from_args(cli: CliArgs, today: NaiveDate) -> Result<Self, ConfigError> {
        let date_range = added_on_range(&cli, today)?;
        let clippings_path =
            flag_or_env(cli.clippings_path, "CLIPPINGS_PATH", DEFAULT_CLIPPINGS_PATH);
        let database_path = flag_or_env(cli.database_path, "DATABASE_PATH", DEFAULT_DATABASE_PATH);

        Ok(Config {
            clippings_path,
            database_path,
            date_range,
        })
    }
}

fn flag_or_env(flag: Option<String>, var: &str, default: &str) -> String {
    flag.or_else(|| std::env::var(var).ok())
        .unwrap_or_else(|| default.to_string())
}

/// Ranges end yesterday unless `--to` says otherwise, so a clipping added
/// while the import runs is left for the next one.
fn added_on_range(
    cli: &CliArgs,
    today: NaiveDate,
) -> Result<Option<(NaiveDate, NaiveDate)>, ConfigError> {
    let yesterday = today - Duration::days(1);

    match (&cli.from, &cli.to, cli.last) {
        (None, None, None) => Ok(None),
        (None, None, Some(days)) => Ok(Some((today - Duration::days(days as i64), yesterday))),
        (_, _, Some(_)) => Err(ConfigError::LastWithRange),
        (None, Some(_), None) => Err(ConfigError::ToWithoutFrom),
        (Some(from), to, None) => {
            let from = flag_date("--from", from)?;
            let to = match to {
                Some(to) => flag_date("--to", to)?,
                None => yesterday,
            };
            if from > to {
                return Err(ConfigError::FromAfterTo { from, to });
            }
            Ok(Some((from, to)))
        }
    }
}

fn flag_date(flag: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ConfigError::BadDate {
        flag,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cli(from: Option<&str>, to: Option<&str>, last: Option<u32>) -> CliArgs {
        CliArgs {
            clippings_path: Some("My Clippings.txt".to_string()),
            database_path: Some("test.db".to_string()),
            from: from.map(String::from),
            to: to.map(String::from),
            last,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_flags_keeps_everything() {
        let cli = make_cli(None, None, None);

        let config = Config::from_args(cli, date(2026, 2, 1)).unwrap();

        assert_eq!(config.date_range, None);
    }

    #[test]
    fn test_last_n_days() {
        let cli = make_cli(None, None, Some(7));
        let today = date(2026, 2, 1);

        let config = Config::from_args(cli, today).unwrap();

        assert_eq!(config.date_range, Some((date(2026, 1, 25), date(2026, 1, 31))));
    }

    #[test]
    fn test_explicit_from_to() {
        let cli = make_cli(Some("2026-01-10"), Some("2026-01-20"), None);
        let today = date(2026, 2, 1);

        let config = Config::from_args(cli, today).unwrap();

        assert_eq!(config.date_range, Some((date(2026, 1, 10), date(2026, 1, 20))));
    }

    #[test]
    fn test_only_from_defaults_to_yesterday() {
        let cli = make_cli(Some("2026-01-10"), None, None);
        let today = date(2026, 2, 1);

        let config = Config::from_args(cli, today).unwrap();

        assert_eq!(config.date_range, Some((date(2026, 1, 10), date(2026, 1, 31))));
    }

    #[test]
    fn test_only_to_is_error() {
        let cli = make_cli(None, Some("2026-01-20"), None);

        let result = Config::from_args(cli, date(2026, 2, 1));

        assert_eq!(result, Err(ConfigError::ToWithoutFrom));
    }

    #[test]
    fn test_last_with_from_is_error() {
        let cli = make_cli(Some("2026-01-10"), None, Some(7));

        let result = Config::from_args(cli, date(2026, 2, 1));

        assert_eq!(result, Err(ConfigError::LastWithRange));
    }

    #[test]
    fn test_from_after_to_is_error() {
        let cli = make_cli(Some("2026-01-20"), Some("2026-01-10"), None);

        let result = Config::from_args(cli, date(2026, 2, 1));

        assert_eq!(
            result,
            Err(ConfigError::FromAfterTo {
                from: date(2026, 1, 20),
                to: date(2026, 1, 10),
            })
        );
    }

    #[test]
    fn test_bad_from_date_is_error() {
        let cli = make_cli(Some("10/01/2026"), None, None);

        let result = Config::from_args(cli, date(2026, 2, 1));

        assert_eq!(
            result,
            Err(ConfigError::BadDate {
                flag: "--from",
                value: "10/01/2026".to_string(),
            })
        );
    }

    #[test]
    fn test_bad_to_date_names_the_flag() {
        let cli = make_cli(Some("2026-01-10"), Some("yesterday"), None);

        let err = Config::from_args(cli, date(2026, 2, 1)).unwrap_err();

        assert_eq!(
            err.to_string(),
            "--to expects a date like 2024-01-31, got 'yesterday'"
        );
    }

    #[test]
    fn test_paths_from_flags() {
        let cli = make_cli(None, None, None);

        let config = Config::from_args(cli, date(2026, 2, 1)).unwrap();

        assert_eq!(config.clippings_path, "My Clippings.txt");
        assert_eq!(config.database_path, "test.db");
    }
}
