use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use climate_api::config::Config;
use climate_api::gateway;
use climate_api::store::{self, Dataset, DatasetSummary};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Hawaii weather-observation API.
#[derive(Parser, Debug)]
#[command(name = "climate-api", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long, short)]
        port: Option<u16>,
        /// SQLite dataset path
        #[arg(long)]
        db: Option<String>,
    },
    /// Print a JSON summary of the dataset
    Inspect {
        #[arg(long)]
        db: Option<String>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, db } => {
            let config = resolve_config(cli.config.as_deref(), host, port, db)?;
            gateway::run_gateway(&config).await
        }
        Command::Inspect { db } => {
            let config = resolve_config(cli.config.as_deref(), None, None, db)?;
            let summary = inspect(&config).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Command::Completions { shell } => {
            write_completions(shell, &mut std::io::stdout());
            Ok(())
        }
    }
}

/// File and environment first, then command-line flags, then validation.
fn resolve_config(
    path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    db: Option<String>,
) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }
    if let Some(db) = db {
        config.store.db_path = db;
    }
    config.validate()?;
    Ok(config)
}

async fn inspect(config: &Config) -> Result<DatasetSummary> {
    let dataset = Dataset::new(config.db_path()?);
    tokio::task::spawn_blocking(move || {
        let conn = dataset.connect()?;
        store::summary::summary(&conn)
    })
    .await
    .context("inspect worker failed")?
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "climate-api", out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn dataset(tmp: &TempDir) -> String {
        let path = tmp.path().join("hawaii.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE station (id INTEGER PRIMARY KEY, station TEXT);
             CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT);
             INSERT INTO station (id, station) VALUES (1, 'USC00519397'), (2, 'USC00519281');
             INSERT INTO measurement (station, date, prcp, tobs) VALUES
                 ('USC00519281', '2010-01-01', 0.1, 70.0),
                 ('USC00519281', '2017-08-23', NULL, 79.0),
                 ('USC00519397', '2016-08-24', 0.3, 80.0);",
        )
        .unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "climate-api",
            "serve",
            "--port",
            "8080",
            "--config",
            "/etc/climate-api.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/etc/climate-api.toml")));
        match cli.command {
            Command::Serve { port, host, db } => {
                assert_eq!(port, Some(8080));
                assert!(host.is_none());
                assert!(db.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_fix_invalid_file_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[gateway]\nport = 0\nhost = \"not-an-ip\"\n").unwrap();

        assert!(resolve_config(Some(&path), None, None, None).is_err());

        let config = resolve_config(
            Some(&path),
            Some("0.0.0.0".into()),
            Some(8080),
            Some("/srv/hawaii.sqlite".into()),
        )
        .unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.store.db_path, "/srv/hawaii.sqlite");
    }

    #[tokio::test]
    async fn inspect_summarizes_dataset() {
        let tmp = TempDir::new().unwrap();
        let db = dataset(&tmp);
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let config = resolve_config(Some(&config_path), None, None, Some(db)).unwrap();
        let summary = inspect(&config).await.unwrap();

        assert_eq!(summary.station_count, 2);
        assert_eq!(summary.measurement_count, 3);
        assert_eq!(summary.earliest_date.unwrap().to_string(), "2010-01-01");
        assert_eq!(summary.latest_date.unwrap().to_string(), "2017-08-23");
        let active = summary.most_active.unwrap();
        assert_eq!(active.station, "USC00519281");
        assert_eq!(active.observations, 2);
    }

    #[tokio::test]
    async fn inspect_reports_missing_dataset() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.store.db_path = tmp.path().join("gone.sqlite").to_string_lossy().into_owned();

        let err = inspect(&config).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to open dataset"));
    }

    #[test]
    fn completions_cover_subcommands() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();

        assert!(script.contains("climate-api"));
        for sub in ["serve", "inspect", "completions"] {
            assert!(script.contains(sub), "completion script is missing {sub}");
        }
    }
}
