mod display;
mod observer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use lotofacil_api::{ApiConfig, CaixaClient, JsonFileSource};
use lotofacil_core::config::{AnalysisConfig, StrategyKind};
use lotofacil_core::frequency::compute_stats;
use lotofacil_core::pipeline::{fetch_window, run};
use lotofacil_core::source::DrawSource;

use crate::display::{display_draws, display_frequency_chart, display_report, display_stats};
use crate::observer::ProgressObserver;

/// Contenu du fichier `--config` : options d'analyse + accès à l'API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CliConfig {
    #[serde(flatten)]
    analysis: AnalysisConfig,
    api: ApiConfig,
}

#[derive(Parser)]
#[command(name = "lotofacil", about = "Générateur de grilles Lotofácil")]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SourceArgs {
    /// Fichier de configuration JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Historique JSON local (tableau de résultats) au lieu de l'API
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// URL de base de l'API des résultats
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyser les derniers concours et générer des grilles
    Generate {
        /// Nombre de grilles à générer
        #[arg(short, long)]
        games: Option<usize>,

        /// Fenêtre d'analyse (nombre de concours)
        #[arg(short, long)]
        window: Option<usize>,

        /// Stratégie de classement des numéros
        #[arg(short, long)]
        strategy: Option<StrategyKind>,

        /// Nombre de numéros retenus pour le tirage des grilles
        #[arg(long)]
        pool_size: Option<usize>,

        /// Nombre d'époques d'entraînement (stratégie model)
        #[arg(long)]
        epochs: Option<usize>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Afficher le graphique des fréquences
        #[arg(long)]
        chart: bool,

        /// Sortie JSON au lieu des tableaux
        #[arg(long)]
        json: bool,
    },

    /// Afficher les statistiques (fréquences et retards)
    Stats {
        /// Fenêtre d'analyse (nombre de concours)
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Lister les derniers concours
    History {
        /// Nombre de concours à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Afficher la configuration effective (JSON)
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = load_config(cli.source.config.as_deref())?;
    if let Some(url) = &cli.source.base_url {
        config.api.base_url = url.clone();
    }

    match cli.command {
        Command::Generate {
            games,
            window,
            strategy,
            pool_size,
            epochs,
            seed,
            chart,
            json,
        } => {
            let analysis = &mut config.analysis;
            if let Some(games) = games {
                analysis.play_count = games;
            }
            if let Some(window) = window {
                analysis.window_size = window;
            }
            if let Some(strategy) = strategy {
                analysis.strategy = strategy;
            }
            if let Some(pool_size) = pool_size {
                analysis.pool_size = pool_size;
            }
            if let Some(epochs) = epochs {
                analysis.model.epochs = epochs;
            }
            cmd_generate(&cli.source, &config, seed, chart, json)
        }
        Command::Stats { window } => {
            if let Some(window) = window {
                config.analysis.window_size = window;
            }
            cmd_stats(&cli.source, &config)
        }
        Command::History { last } => cmd_history(&cli.source, &config, last),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config: CliConfig = serde_json::from_str(&json)
        .with_context(|| format!("JSON invalide dans {}", path.display()))?;
    Ok(config)
}

fn open_source(args: &SourceArgs, config: &CliConfig) -> Result<Box<dyn DrawSource>> {
    let rules = config.analysis.rules();
    match &args.history {
        Some(path) => {
            let source = JsonFileSource::open(path, &rules)?;
            Ok(Box::new(source))
        }
        None => {
            let client = CaixaClient::new(config.api.clone(), rules)?;
            Ok(Box::new(client))
        }
    }
}

fn cmd_generate(
    args: &SourceArgs,
    config: &CliConfig,
    seed: Option<u64>,
    chart: bool,
    json: bool,
) -> Result<()> {
    config
        .analysis
        .validate()
        .context("Configuration invalide")?;

    let source = open_source(args, config)?;
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut observer = ProgressObserver::new()?;
    let report = run(source.as_ref(), &config.analysis, &mut rng, &mut observer)
        .context("Échec de l'analyse")?;
    observer.finish();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report, chart);
    }
    Ok(())
}

fn cmd_stats(args: &SourceArgs, config: &CliConfig) -> Result<()> {
    let analysis = &config.analysis;
    let rules = analysis.rules();
    let source = open_source(args, config)?;

    let mut observer = ProgressObserver::new()?;
    let window = fetch_window(source.as_ref(), analysis.window_size, &rules, &mut observer)?;
    observer.finish();

    let stats = compute_stats(&window, rules.domain_size)?;
    display_stats(&stats, window.len());

    let frequency = lotofacil_core::frequency::aggregate(&window, rules.domain_size)?;
    display_frequency_chart(&frequency);
    Ok(())
}

fn cmd_history(args: &SourceArgs, config: &CliConfig, last: usize) -> Result<()> {
    let source = open_source(args, config)?;
    let mut observer = ProgressObserver::new()?;
    let draws = fetch_window(source.as_ref(), last, &config.analysis.rules(), &mut observer)?;
    observer.finish();
    display_draws(&draws);
    Ok(())
}
