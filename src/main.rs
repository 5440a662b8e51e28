use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hrdd_risk::catalogue::{Catalogue, CatalogueLoader};
use hrdd_risk::config::Config;
use hrdd_risk::output::{self, PortfolioRow, ScoredCountry};
use hrdd_risk::portfolio::{self, PortfolioState};
use hrdd_risk::risk::{weight_errors, RiskEngine, WeightVector};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CATALOGUE: i32 = 1;
const EXIT_STATE: i32 = 2;
const EXIT_USAGE: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List countries sorted by risk score (default if no subcommand)
    Scores {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show one country's score breakdown
    Country {
        /// ISO code of the country
        iso_code: String,
    },
    /// Volume-weighted baseline risk of the selected portfolio
    Baseline,
    /// Edit or show the portfolio selection
    Portfolio {
        #[command(subcommand)]
        action: PortfolioAction,
    },
    /// Show the risk band table
    Bands,
    /// Create a config file interactively
    Init,
}

#[derive(Subcommand, Debug)]
enum PortfolioAction {
    /// Add countries to the portfolio
    Add {
        /// ISO codes to add
        #[arg(required = true)]
        iso_codes: Vec<String>,
        /// Volume for the added countries (defaults to config default_volume, then 10)
        #[arg(long)]
        volume: Option<f64>,
    },
    /// Remove countries from the portfolio
    Remove {
        #[arg(required = true)]
        iso_codes: Vec<String>,
    },
    /// Set the volume of a selected country
    Volume { iso_code: String, volume: f64 },
    /// Remove every country from the portfolio
    Clear,
    /// List the selected countries
    Show,
}

#[derive(Parser, Debug)]
#[command(name = "hrdd-risk")]
#[command(about = "Human-rights due-diligence country risk triage", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/hrdd-risk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalogue CSV (overrides config)
    #[arg(long, global = true)]
    catalogue: Option<PathBuf>,

    /// Indicator weights, comma separated (overrides config), e.g. 20,20,5,10,10
    #[arg(long, global = true)]
    weights: Option<String>,

    /// Portfolio state file (defaults to ~/.config/hrdd-risk/portfolio.json)
    #[arg(long, global = true)]
    portfolio: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "hrdd_risk=debug"
    } else {
        "hrdd_risk=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Scores { tsv: false });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = hrdd_risk::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match hrdd_risk::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = hrdd_risk::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let weights = resolve_weights(cli.weights.as_deref(), &config);
    tracing::debug!(weights = ?weights.0, "effective weights");

    let engine = RiskEngine::new();
    let ctx = Context {
        engine: &engine,
        config: &config,
        weights,
        catalogue_path: cli.catalogue.or_else(|| config.catalogue.clone()),
        portfolio_path: cli.portfolio,
        verbose: cli.verbose,
        use_colors: output::should_use_colors(),
    };

    match command {
        Commands::Scores { tsv } => run_scores(&ctx, tsv),
        Commands::Country { iso_code } => run_country(&ctx, &iso_code),
        Commands::Baseline => run_baseline(&ctx),
        Commands::Portfolio { action } => run_portfolio(&ctx, action),
        Commands::Bands => println!("{}", output::format_band_table(ctx.use_colors)),
        Commands::Init => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Everything a subcommand needs, resolved once in `main`
struct Context<'a> {
    engine: &'a RiskEngine,
    config: &'a Config,
    weights: WeightVector,
    catalogue_path: Option<PathBuf>,
    portfolio_path: Option<PathBuf>,
    verbose: bool,
    use_colors: bool,
}

/// CLI weights win over config weights; both are range-checked.
fn resolve_weights(cli_weights: Option<&str>, config: &Config) -> WeightVector {
    let Some(raw) = cli_weights else {
        return match config.effective_weights() {
            Ok(w) => w,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
    };

    let weights = match WeightVector::parse(raw) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Invalid --weights '{}': {}", raw, e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Err(errors) = weight_errors(weights.as_slice()) {
        eprintln!("Invalid --weights:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    weights
}

/// Load the catalogue or exit. Duplicates are reported but do not stop the run.
fn load_catalogue(ctx: &Context) -> Catalogue {
    let Some(path) = ctx.catalogue_path.as_ref() else {
        eprintln!("No catalogue configured. Pass --catalogue <file> or set `catalogue:` in the config.");
        std::process::exit(EXIT_CONFIG);
    };

    let catalogue = match CatalogueLoader::new().load_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalogue error: {:#}", e);
            std::process::exit(EXIT_CATALOGUE);
        }
    };

    for dup in &catalogue.duplicates {
        eprintln!(
            "Warning: duplicate ISO code {}: '{}' replaced by '{}'",
            dup.iso_code, dup.replaced_name, dup.with_name
        );
    }
    if ctx.verbose {
        eprintln!("Loaded {} countries from {}", catalogue.len(), path.display());
    }
    catalogue
}

fn portfolio_path(ctx: &Context) -> PathBuf {
    if let Some(p) = &ctx.portfolio_path {
        return p.clone();
    }
    match portfolio::get_portfolio_path() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Portfolio error: {:#}", e);
            std::process::exit(EXIT_STATE);
        }
    }
}

fn load_state(path: &Path) -> PortfolioState {
    match portfolio::load_portfolio_state(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Portfolio error: {:#}", e);
            std::process::exit(EXIT_STATE);
        }
    }
}

fn save_state(path: &Path, state: &mut PortfolioState) {
    state.touch();
    if let Err(e) = portfolio::save_portfolio_state(path, state) {
        eprintln!("Portfolio error: {:#}", e);
        std::process::exit(EXIT_STATE);
    }
}

/// Match a user-typed code against known codes, ignoring ASCII case.
fn resolve_code<'a>(mut known: impl Iterator<Item = &'a str>, input: &str) -> Option<String> {
    known
        .find(|code| code.eq_ignore_ascii_case(input))
        .map(str::to_string)
}

/// Reject a volume before any portfolio change is made.
fn check_volume(volume: f64) -> Result<f64, String> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(format!("Invalid volume {}: must be a non-negative number", volume));
    }
    Ok(volume)
}

/// `--volume` if given, else the configured default.
fn resolve_add_volume(volume: Option<f64>, config: &Config) -> Result<f64, String> {
    check_volume(volume.unwrap_or_else(|| config.effective_default_volume()))
}

fn run_scores(ctx: &Context, tsv: bool) {
    let catalogue = load_catalogue(ctx);

    let mut scored: Vec<ScoredCountry> = catalogue
        .countries
        .iter()
        .map(|country| {
            let score = ctx.engine.weighted_score(country, &ctx.weights);
            ScoredCountry {
                country,
                score,
                band: ctx.engine.band(score),
            }
        })
        .collect();

    // Highest risk first, ties alphabetical
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.country.name.cmp(&b.country.name))
    });

    if tsv {
        let out = output::format_tsv(&scored);
        if !out.is_empty() {
            println!("{}", out);
        }
    } else if ctx.verbose && !scored.is_empty() {
        for s in &scored {
            let breakdown = ctx.engine.score_breakdown(s.country, &ctx.weights);
            println!(
                "{}",
                output::format_country_detail(s.country, &breakdown, &s.band, ctx.use_colors)
            );
            println!();
        }
    } else {
        println!("{}", output::format_scored_table(&scored, ctx.use_colors));
    }
}

fn run_country(ctx: &Context, input: &str) {
    let catalogue = load_catalogue(ctx);
    let codes = catalogue.countries.iter().map(|c| c.iso_code.as_str());
    let Some(country) = resolve_code(codes, input).and_then(|code| catalogue.get(&code)) else {
        eprintln!("Unknown ISO code: {}", input);
        std::process::exit(EXIT_USAGE);
    };

    let breakdown = ctx.engine.score_breakdown(country, &ctx.weights);
    let band = ctx.engine.band(breakdown.score);
    println!(
        "{}",
        output::format_country_detail(country, &breakdown, &band, ctx.use_colors)
    );
}

fn run_baseline(ctx: &Context) {
    let catalogue = load_catalogue(ctx);
    let state = load_state(&portfolio_path(ctx));
    let selection = &state.selection;

    let scores = ctx.engine.score_catalogue(&catalogue, &ctx.weights);

    let rows: Vec<PortfolioRow> = selection
        .iter()
        .map(|iso_code| {
            let name = catalogue.get(iso_code).map(|c| c.name.as_str());
            if name.is_none() {
                eprintln!("Warning: {} is not in the catalogue, counted as score 0", iso_code);
            }
            let score = scores.get(iso_code).copied().unwrap_or(0.0);
            PortfolioRow {
                iso_code,
                name,
                volume: selection.volume(iso_code),
                score,
                band: ctx.engine.band(score),
            }
        })
        .collect();

    let baseline = ctx.engine.baseline_risk(selection, &scores);
    let total_volume: f64 = rows.iter().map(|r| r.volume).sum();

    println!("{}", output::format_portfolio_table(&rows, ctx.use_colors));
    println!();
    println!(
        "{}",
        output::format_baseline(
            baseline,
            &ctx.engine.band(baseline),
            rows.len(),
            total_volume,
            ctx.use_colors
        )
    );
}

fn run_portfolio(ctx: &Context, action: PortfolioAction) {
    let path = portfolio_path(ctx);
    let mut state = load_state(&path);

    match action {
        PortfolioAction::Add { iso_codes, volume } => {
            let volume = match resolve_add_volume(volume, &ctx.config) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
            };
            let catalogue = load_catalogue(ctx);

            let mut resolved = Vec::with_capacity(iso_codes.len());
            for input in &iso_codes {
                let codes = catalogue.countries.iter().map(|c| c.iso_code.as_str());
                match resolve_code(codes, input) {
                    Some(code) => resolved.push(code),
                    None => {
                        eprintln!("Unknown ISO code: {}", input);
                        std::process::exit(EXIT_USAGE);
                    }
                }
            }

            for code in resolved {
                if !state.selection.add(code.as_str()) {
                    eprintln!("{} is already selected", code);
                    continue;
                }
                state.selection.set_volume(&code, volume);
                println!("Added {}", code);
            }
            save_state(&path, &mut state);
        }
        PortfolioAction::Remove { iso_codes } => {
            for input in &iso_codes {
                match resolve_code(state.selection.iter(), input) {
                    Some(code) => {
                        state.selection.remove(&code);
                        println!("Removed {}", code);
                    }
                    None => eprintln!("{} is not selected", input),
                }
            }
            save_state(&path, &mut state);
        }
        PortfolioAction::Volume { iso_code, volume } => {
            let Some(code) = resolve_code(state.selection.iter(), &iso_code) else {
                eprintln!("{} is not selected", iso_code);
                std::process::exit(EXIT_USAGE);
            };
            if let Err(e) = check_volume(volume) {
                eprintln!("{}", e);
                std::process::exit(EXIT_USAGE);
            }
            state.selection.set_volume(&code, volume);
            println!("Set volume of {} to {}", code, volume);
            save_state(&path, &mut state);
        }
        PortfolioAction::Clear => {
            let count = state.selection.len();
            state.selection.clear();
            save_state(&path, &mut state);
            println!("Cleared {} countries", count);
        }
        PortfolioAction::Show => {
            if state.selection.is_empty() {
                println!("No countries selected.");
                return;
            }
            run_baseline(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_code_ignores_case() {
        let known = ["DEU", "BRA"];
        assert_eq!(resolve_code(known.into_iter(), "deu"), Some("DEU".to_string()));
        assert_eq!(resolve_code(known.into_iter(), "FRA"), None);
    }

    #[test]
    fn test_check_volume() {
        assert_eq!(check_volume(0.0), Ok(0.0));
        assert_eq!(check_volume(25.5), Ok(25.5));
        assert!(check_volume(-1.0).unwrap_err().contains("non-negative"));
        assert!(check_volume(f64::NAN).is_err());
        assert!(check_volume(f64::INFINITY).is_err());
    }

    #[test]
    fn test_cli_accepts_negative_volume_for_later_rejection() {
        // clap parses the value; the add path rejects it before touching the selection
        let cli = Cli::try_parse_from([
            "hrdd-risk",
            "portfolio",
            "add",
            "DEU",
            "--volume=-5",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Portfolio {
                action: PortfolioAction::Add { volume, .. },
            }) => {
                assert_eq!(volume, Some(-5.0));
                assert!(check_volume(volume.unwrap()).is_err());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_add_volume_falls_back_to_config_default() {
        let config = Config {
            default_volume: Some(4.0),
            ..Config::default()
        };
        assert_eq!(resolve_add_volume(Some(7.0), &config), Ok(7.0));
        assert_eq!(resolve_add_volume(None, &config), Ok(4.0));
        assert_eq!(
            resolve_add_volume(None, &Config::default()),
            Ok(portfolio::DEFAULT_VOLUME)
        );
        assert!(resolve_add_volume(Some(-1.0), &config).is_err());
    }

    #[test]
    fn test_cli_parses_portfolio_add() {
        let cli = Cli::try_parse_from([
            "hrdd-risk",
            "--weights",
            "1,2,3,4,5",
            "portfolio",
            "add",
            "DEU",
            "BRA",
            "--volume",
            "25",
        ])
        .unwrap();
        assert_eq!(cli.weights.as_deref(), Some("1,2,3,4,5"));
        match cli.command {
            Some(Commands::Portfolio {
                action: PortfolioAction::Add { iso_codes, volume },
            }) => {
                assert_eq!(iso_codes, vec!["DEU", "BRA"]);
                assert_eq!(volume, Some(25.0));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_default_command_is_none() {
        let cli = Cli::try_parse_from(["hrdd-risk"]).unwrap();
        assert!(cli.command.is_none());
    }
}
