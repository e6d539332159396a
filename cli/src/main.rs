//! paramsync CLI: synchronize a YAML parameter document into a store.
//!
//! # Usage
//!
//! ```text
//! paramsync sync params.yaml --store file:/var/lib/params.json
//! paramsync plan params.yaml --store file:/var/lib/params.json --json
//! paramsync sync params.yaml --region eu-west-1
//! PARAMSYNC_STORE=memory: paramsync sync params.yaml -v
//! ```

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use paramsync_core::data::settings;
use paramsync_core::sync::{self, Synchronizer};
use paramsync_core::types::Settings;
use paramsync_core::{SyncError, SyncReport};

/// Log filter override, e.g. `PARAMSYNC_LOG=paramsync_core=debug`.
const LOG_ENV: &str = "PARAMSYNC_LOG";


#[derive(Parser, Debug)]
#[command(name = "paramsync")]
#[command(about = "Synchronize a YAML parameter document into a parameter store")]
struct Cli {
    /// Settings file (defaults to $PARAMSYNC_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Store endpoint: `memory:`, `file:<path>` or `ssm:<region>`.
    #[arg(long, global = true)]
    store: Option<String>,
    /// Region of the ssm store. Selects `ssm:` when no store is given.
    #[arg(long, global = true)]
    region: Option<String>,
    /// Retries for transient store errors.
    #[arg(long, global = true)]
    retries: Option<u32>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write every parameter that is missing or out of date.
    Sync { document: PathBuf },
    /// Show what `sync` would do without writing.
    Plan { document: PathBuf },
}


fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(report) => emit(render(&report, cli.json)),
        Err(e) => {
            eprintln!("paramsync: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn render(report: &SyncReport, json: bool) -> Result<String, serde_json::Error> {
    if json {
        output::render_json(report)
    } else {
        Ok(output::render_text(report))
    }
}

/// Print a rendered report. A report that cannot be rendered fails the run.
fn emit(rendered: Result<String, serde_json::Error>) -> ExitCode {
    match rendered {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("paramsync: cannot render report: {}", e);
            ExitCode::FAILURE
        }
    }
}


fn run(cli: &Cli) -> Result<SyncReport, SyncError> {
    let resolved = resolve_settings(cli)?;
    let locator = settings::store_locator(&resolved)?;

    let (document, apply) = match &cli.command {
        Commands::Sync { document } => (document.as_path(), true),
        Commands::Plan { document } => (document.as_path(), false),
    };

    // Flatten fully before opening the store.
    let records = sync::load_records(document, &mut rand::rng())?;
    info!(
        region = resolved.region.as_deref().unwrap_or("-"),
        store = ?locator,
        "synchronizing {} parameters",
        records.len()
    );

    let store = locator.open()?;
    let retry = settings::retry_policy(&resolved);
    let mut synchronizer = Synchronizer::new(store).with_retry(retry);
    if apply {
        synchronizer.apply(&records)
    } else {
        synchronizer.plan(&records)
    }
}

fn resolve_settings(cli: &Cli) -> Result<Settings, SyncError> {
    let mut s = settings::resolve(cli.config.as_deref())?;
    apply_flags(&mut s, cli);
    Ok(s)
}

/// Command-line flags take precedence over file and environment.
fn apply_flags(s: &mut Settings, cli: &Cli) {
    if let Some(store) = &cli.store {
        s.store = Some(store.clone());
    }
    if let Some(region) = &cli.region {
        s.region = Some(region.clone());
    }
    if let Some(retries) = cli.retries {
        s.max_retries = retries;
    }
}

fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let _ = tracing::subscriber::set_global_default(subscriber);
}


#[cfg(test)]
mod tests {
    use super::*;
    use paramsync_core::store::StoreLocator;
    use std::fs;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["paramsync"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn parses_sync_with_store() {
        let cli = parse(&["sync", "params.yaml", "--store", "memory:"]);
        assert!(matches!(
            cli.command,
            Commands::Sync { ref document } if document == Path::new("params.yaml")
        ));
        assert_eq!(cli.store.as_deref(), Some("memory:"));
    }

    #[test]
    fn document_is_required() {
        assert!(Cli::try_parse_from(["paramsync", "sync"]).is_err());
    }

    #[test]
    fn flags_override_settings() {
        let cli = parse(&[
            "plan", "p.yaml", "--store", "memory:", "--region", "eu-west-1", "--retries", "4",
        ]);
        let mut s = Settings {
            store: Some("file:/tmp/other.json".into()),
            ..Settings::default()
        };
        apply_flags(&mut s, &cli);
        assert_eq!(s.store.as_deref(), Some("memory:"));
        assert_eq!(s.region.as_deref(), Some("eu-west-1"));
        assert_eq!(s.max_retries, 4);
    }

    #[test]
    fn filter_levels() {
        assert_eq!(default_filter(0, false), "info");
        assert_eq!(default_filter(1, false), "debug");
        assert_eq!(default_filter(3, false), "trace");
        assert_eq!(default_filter(2, true), "error");
    }

    #[test]
    fn run_against_file_store() {
        let dir = std::env::temp_dir()
            .join(format!("paramsync-cli-test-{}", std::process::id()));
        let _ = fs::create_dir_all(&dir);
        let doc = dir.join("params.yaml");
        let store = dir.join("store.json");
        let yaml = "app:\n  name: billing\n  key:\n    type: secure\n    version: 1\n";
        fs::write(&doc, yaml).unwrap();

        let store_arg = format!("file:{}", store.display());
        let doc_arg = doc.display().to_string();

        let plan = run(&parse(&["plan", &doc_arg, "--store", &store_arg])).unwrap();
        assert_eq!(plan.written(), vec!["/app/key", "/app/name"]);
        assert!(!store.exists());

        let first = run(&parse(&["sync", &doc_arg, "--store", &store_arg])).unwrap();
        assert_eq!(first.summary(), "2 created, 0 updated, 0 unchanged");
        let second = run(&parse(&["sync", &doc_arg, "--store", &store_arg])).unwrap();
        assert_eq!(second.summary(), "0 created, 0 updated, 2 unchanged");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn run_rejects_sequences() {
        let dir = std::env::temp_dir()
            .join(format!("paramsync-cli-seq-{}", std::process::id()));
        let _ = fs::create_dir_all(&dir);
        let doc = dir.join("params.yaml");
        fs::write(&doc, "hosts: [a, b]\n").unwrap();
        let doc_arg = doc.display().to_string();
        let err = run(&parse(&["sync", &doc_arg, "--store", "memory:"])).unwrap_err();
        assert!(matches!(err, SyncError::Input(_)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn render_failure_is_a_failed_run() {
        let broken = serde_json::from_str::<u8>("not json").unwrap_err();
        let failed = format!("{:?}", emit(Err(broken)));
        assert_eq!(failed, format!("{:?}", ExitCode::FAILURE));
        let ok = format!("{:?}", emit(Ok("{}".to_string())));
        assert_eq!(ok, format!("{:?}", ExitCode::SUCCESS));
    }

    #[test]
    fn render_picks_format() {
        let report = SyncReport::default();
        let json = render(&report, true).unwrap();
        assert!(json.trim_start().starts_with('{'));
        assert_eq!(render(&report, false).unwrap(), output::render_text(&report));
    }

    #[test]
    fn region_alone_selects_ssm() {
        let cli = parse(&["plan", "p.yaml", "--region", "eu-west-1"]);
        let mut s = Settings::default();
        apply_flags(&mut s, &cli);
        assert_eq!(
            settings::store_locator(&s).unwrap(),
            StoreLocator::Ssm(Some("eu-west-1".into()))
        );
    }
}
