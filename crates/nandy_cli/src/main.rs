//! CLI driver for `nandy_core`.
//!
//! # Responsibility
//! - Print core linkage/version info when run without arguments.
//! - Run one reminder sweep against a database file, printing speech
//!   messages as JSON lines on stdout.
//!
//! Usage: `nandy_cli [remind [--config <config.json>] [db_path]]`
//!
//! The database path falls back to `db_path` from the config file.

use log::error;
use nandy_core::{
    init_logging, open_db, ChoreService, JsonLinesChannel, NandyConfig, PlaintextMetrics,
    SqliteChoreRepository, SqlitePersonRepository, SystemClock, Workflow,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const USAGE: &str = "usage: nandy_cli [remind [--config <config.json>] [db_path]]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => {
            println!("nandy_core ping={}", nandy_core::ping());
            println!("nandy_core version={}", nandy_core::core_version());
            ExitCode::SUCCESS
        }
        Some("remind") => match run_remind(&args[1..]) {
            Ok(reminded) => {
                eprintln!("reminded={reminded}");
                ExitCode::SUCCESS
            }
            Err(message) => {
                error!(
                    "event=cli_remind module=cli status=error error={}",
                    nandy_core::logging::field(&message)
                );
                eprintln!("error: {message}");
                ExitCode::FAILURE
            }
        },
        Some(other) => {
            eprintln!("unknown command `{other}`; {USAGE}");
            ExitCode::from(2)
        }
    }
}

/// Arguments accepted by `remind`.
#[derive(Debug, Default, PartialEq, Eq)]
struct RemindArgs {
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl RemindArgs {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| format!("--config requires a path; {USAGE}"))?;
                    parsed.config_path = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => {
                    return Err(format!("unknown option `{flag}`; {USAGE}"));
                }
                path if parsed.db_path.is_none() => parsed.db_path = Some(PathBuf::from(path)),
                extra => return Err(format!("unexpected argument `{extra}`; {USAGE}")),
            }
        }
        Ok(parsed)
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<NandyConfig, String> {
    let Some(path) = path else {
        return Ok(NandyConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
    NandyConfig::from_json_str(&text)
        .map_err(|err| format!("invalid config `{}`: {err}", path.display()))
}

fn run_remind(args: &[String]) -> Result<usize, String> {
    let args = RemindArgs::parse(args)?;
    let config = load_config(args.config_path.as_ref())?;
    let db_path = config
        .resolve_db_path(args.db_path.as_deref())
        .ok_or_else(|| format!("remind requires a database path or a config db_path; {USAGE}"))?;
    init_logging(&config).map_err(|err| err.to_string())?;

    let conn = open_db(&db_path).map_err(|err| err.to_string())?;
    let workflow = Workflow::new(
        Arc::new(JsonLinesChannel::new(&config.speech, std::io::stdout())),
        Arc::new(PlaintextMetrics::new(&config.metrics, std::io::sink())),
        Arc::new(SystemClock),
    )
    .with_default_language(config.default_language.clone());

    let service = ChoreService::new(
        SqliteChoreRepository::new(&conn),
        SqlitePersonRepository::new(&conn),
        workflow,
    );
    service.remind_all().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{load_config, RemindArgs};
    use std::path::PathBuf;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn remind_args_accept_config_before_or_after_db_path() {
        let expected = RemindArgs {
            db_path: Some(PathBuf::from("chores.db")),
            config_path: Some(PathBuf::from("nandy.json")),
        };
        assert_eq!(
            RemindArgs::parse(&args(&["--config", "nandy.json", "chores.db"])).unwrap(),
            expected
        );
        assert_eq!(
            RemindArgs::parse(&args(&["chores.db", "--config", "nandy.json"])).unwrap(),
            expected
        );
    }

    #[test]
    fn remind_args_reject_extra_and_dangling_values() {
        assert!(RemindArgs::parse(&args(&["a.db", "b.db"])).is_err());
        assert!(RemindArgs::parse(&args(&["--config"])).is_err());
        assert!(RemindArgs::parse(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn db_path_falls_back_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nandy.json");
        std::fs::write(&config_path, r#"{"db_path": "/srv/nandy/chores.db"}"#).unwrap();

        let parsed = RemindArgs::parse(&args(&["--config", config_path.to_str().unwrap()])).unwrap();
        assert_eq!(parsed.db_path, None);

        let config = load_config(parsed.config_path.as_ref()).unwrap();
        assert_eq!(
            config.resolve_db_path(parsed.db_path.as_deref()),
            Some(PathBuf::from("/srv/nandy/chores.db"))
        );
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = load_config(Some(&PathBuf::from("/nonexistent/nandy.json"))).unwrap_err();
        assert!(err.contains("failed to read config"));
    }
}
