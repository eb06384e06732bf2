use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use pollbet_execution::{outcome_rng, RoundController};
use pollbet_types::Catalog;
use serde::{Deserialize, Serialize};
use tracing::{info, Level};

mod commands;
mod session;
mod store;

use store::FileStore;

/// CLI flags (user-provided override persisted config)
#[derive(Parser, Debug)]
#[command(name = "pollbet", about = "Betting pool simulator for the terminal")]
struct Args {
    /// Store file holding tokens, bets and player stats
    #[arg(long)]
    store: Option<PathBuf>,

    /// JSON poll catalog: [{"question": "...", "options": ["...", "..."]}]
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Seed for reproducible winner picks (not persisted)
    #[arg(long)]
    seed: Option<u64>,

    /// Log every persist at debug level
    #[arg(long)]
    verbose: bool,
}

#[derive(Serialize, Deserialize, Default, Debug)]
struct PersistedConfig {
    store: Option<PathBuf>,
    catalog: Option<PathBuf>,
    verbose: Option<bool>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = load_config().unwrap_or_default();

    let store_path = match args.store.clone().or_else(|| cfg.store.clone()) {
        Some(path) => path,
        None => default_store_path().ok_or_else(|| anyhow!("no home directory; pass --store"))?,
    };
    let catalog_path = args.catalog.clone().or_else(|| cfg.catalog.clone());
    let verbose = args.verbose || cfg.verbose.unwrap_or(false);

    cfg.store = Some(store_path.clone());
    cfg.catalog = catalog_path.clone();
    cfg.verbose = Some(verbose);
    save_config(&cfg)?;

    init_tracing(verbose);

    let catalog = match &catalog_path {
        Some(path) => load_catalog(path)?,
        None => Catalog::default(),
    };
    let store = FileStore::open(&store_path)?;
    info!(
        store = %store.path().display(),
        polls = catalog.len(),
        seed = ?args.seed,
        "starting"
    );

    let mut round = RoundController::new(catalog, store, outcome_rng(args.seed))?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session::run(&mut round, stdin.lock(), &mut stdout)
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog {}", path.display()))?;
    Catalog::from_json(&raw).with_context(|| format!("invalid catalog {}", path.display()))
}

fn load_config() -> Option<PersistedConfig> {
    let path = config_path()?;
    let data = std::fs::read(path).ok()?;
    serde_json::from_slice(&data).ok()
}

fn save_config(cfg: &PersistedConfig) -> Result<()> {
    if let Some(path) = config_path() {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        std::fs::write(path, data)?;
    }
    Ok(())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "pollbet", "terminal")
}

fn config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.json"))
}

fn default_store_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().join("store.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let args = Args::parse_from([
            "pollbet",
            "--store",
            "/tmp/s.json",
            "--seed",
            "9",
            "--verbose",
        ]);
        assert_eq!(args.store, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(args.seed, Some(9));
        assert!(args.verbose);
        assert!(args.catalog.is_none());
    }

    #[test]
    fn custom_catalog_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polls.json");
        std::fs::write(
            &path,
            r#"[{"question":"Rain tomorrow?","options":["Yes","No"]}]"#,
        )
        .unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().options, vec!["Yes", "No"]);

        std::fs::write(&path, r#"[{"question":"Lonely?","options":["Yes"]}]"#).unwrap();
        assert!(load_catalog(&path).is_err());
    }

    #[test]
    fn session_resumes_from_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        let mut round = RoundController::new(Catalog::default(), store, outcome_rng(Some(3))).unwrap();
        round.place_bet("Alice", Some("Team Red"), 25).unwrap();

        let store = FileStore::open(&path).unwrap();
        let round = RoundController::new(Catalog::default(), store, outcome_rng(None)).unwrap();
        assert_eq!(round.balance(), 75);
        assert_eq!(round.ledger().len(), 1);
    }
}
