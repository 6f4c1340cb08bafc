use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use wp_rank::config::{self, Config};
use wp_rank::insight::{InsightClient, InsightError, InsightRequest, InsightSlot};
use wp_rank::output;
use wp_rank::scoring::{self, Criterion, CriterionMap, Scores};
use wp_rank::store::{EmployeeDraft, EmployeeId, EmployeeUpdate, ScoreStore, StoreError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_STORAGE: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_INVALID: i32 = 3;
const EXIT_CONFIG: i32 = 4;

/// Score used for criteria left out of `add`, same as an empty evaluation form
const DEFAULT_SCORE: u8 = 5;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Args, Debug, Default)]
struct ScoreArgs {
    /// Punctuality and adherence to rules (1-10)
    #[arg(long)]
    discipline: Option<u8>,
    /// Volume and speed of completed work (1-10)
    #[arg(long)]
    productivity: Option<u8>,
    /// Thoroughness of finished work (1-10)
    #[arg(long)]
    work_quality: Option<u8>,
    /// Ability to collaborate with colleagues (1-10)
    #[arg(long)]
    teamwork: Option<u8>,
    /// Proactive action and new ideas (1-10)
    #[arg(long)]
    initiative: Option<u8>,
    /// Dedication and commitment to the company (1-10)
    #[arg(long)]
    loyalty: Option<u8>,
}

impl ScoreArgs {
    fn to_map(&self) -> CriterionMap<Option<u8>> {
        CriterionMap {
            discipline: self.discipline,
            productivity: self.productivity,
            work_quality: self.work_quality,
            teamwork: self.teamwork,
            initiative: self.initiative,
            loyalty: self.loyalty,
        }
    }
}

#[derive(Args, Debug, Default)]
struct WeightArgs {
    #[arg(long)]
    discipline: Option<f64>,
    #[arg(long)]
    productivity: Option<f64>,
    #[arg(long)]
    work_quality: Option<f64>,
    #[arg(long)]
    teamwork: Option<f64>,
    #[arg(long)]
    initiative: Option<f64>,
    #[arg(long)]
    loyalty: Option<f64>,
}

impl WeightArgs {
    fn to_map(&self) -> CriterionMap<Option<f64>> {
        CriterionMap {
            discipline: self.discipline,
            productivity: self.productivity,
            work_quality: self.work_quality,
            teamwork: self.teamwork,
            initiative: self.initiative,
            loyalty: self.loyalty,
        }
    }
}

#[derive(Subcommand, Debug)]
enum WeightsCommand {
    /// Show weights and their share of the total (default)
    Show,
    /// Change weights; criteria left out keep their current weight
    #[command(allow_negative_numbers = true)]
    Set(WeightArgs),
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank employees by weighted score (default if no subcommand)
    Rank {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Also print raw, normalized and weighted tables
        #[arg(short, long)]
        breakdown: bool,
    },
    /// List employees in the order they were added
    Employees,
    /// Add an employee; criteria left out default to 5
    Add {
        name: String,
        #[command(flatten)]
        scores: ScoreArgs,
    },
    /// Change an employee's name or scores
    Update {
        id: EmployeeId,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        scores: ScoreArgs,
    },
    /// Remove an employee by id
    Remove { id: EmployeeId },
    /// Show or change criterion weights
    Weights {
        #[command(subcommand)]
        command: Option<WeightsCommand>,
    },
    /// Delete all employees and restore default weights
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Averages per criterion and overall
    Stats,
    /// Ask the insight service to summarize the current ranking
    Insight,
}

#[derive(Parser, Debug)]
#[command(name = "wp-rank")]
#[command(about = "Employee ranking with the Weighted Point Method", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/wp-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the state file (overrides config)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    wp_rank::install_crypto_provider();

    let cli = Cli::parse();
    if let Err(e) = wp_rank::telemetry::init(cli.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    let command = cli.command.unwrap_or(Commands::Rank {
        format: OutputFormat::Table,
        breakdown: false,
    });

    // Load config
    let config = match config::load_config(cli.config.map(PathBuf::from)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let state_path = cli.state.unwrap_or_else(|| config.state_path());
    debug!(path = %state_path.display(), "opening store");

    let mut store = match ScoreStore::open(&state_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Storage error: {:#}", e);
            std::process::exit(EXIT_STORAGE);
        }
    };

    let code = match run(command, &mut store, &config).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report(&e),
    };
    std::process::exit(code);
}

/// Print an error and pick its exit code
fn report(err: &anyhow::Error) -> i32 {
    if let Some(store_err) = err.downcast_ref::<StoreError>() {
        return match store_err {
            StoreError::Validation(errors) => {
                eprintln!("Invalid input:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                EXIT_INVALID
            }
            StoreError::NotFound(_) => {
                eprintln!("{}", store_err);
                EXIT_INVALID
            }
            StoreError::Storage(e) => {
                eprintln!("Storage error: {:#}", e);
                EXIT_STORAGE
            }
        };
    }

    if let Some(insight_err) = err.downcast_ref::<InsightError>() {
        eprintln!("Insight error: {}", insight_err);
        return match insight_err {
            InsightError::NotConfigured | InsightError::InvalidConfig(_) => EXIT_CONFIG,
            _ => EXIT_NETWORK,
        };
    }

    eprintln!("Error: {:#}", err);
    EXIT_INVALID
}

async fn run(command: Commands, store: &mut ScoreStore, config: &Config) -> Result<()> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Rank { format, breakdown } => {
            let snapshot = store.snapshot();
            let ranking = scoring::compute(&snapshot.employees, &snapshot.weights);
            for warning in &ranking.warnings {
                eprintln!("Note: {}", output::format_warning(*warning));
            }

            match format {
                OutputFormat::Table => {
                    println!("{}", output::format_ranking_table(&ranking, use_colors));
                    if breakdown && !ranking.is_empty() {
                        println!();
                        println!("{}", output::format_breakdown(&ranking, use_colors));
                    }
                }
                OutputFormat::Tsv => {
                    let tsv = output::format_tsv(&ranking);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                OutputFormat::Json => {
                    let json = output::format_json(&ranking).context("Failed to encode ranking")?;
                    println!("{}", json);
                }
            }
        }
        Commands::Employees => {
            println!(
                "{}",
                output::format_employee_list(store.employees(), use_colors)
            );
        }
        Commands::Add { name, scores } => {
            let given = scores.to_map();
            let scores = Scores::from_fn(|c| given[c].unwrap_or(DEFAULT_SCORE));
            let employee = store.add_employee(EmployeeDraft::new(name, scores))?;
            println!("Added {} (#{})", employee.name, employee.id);
        }
        Commands::Update { id, name, scores } => {
            let update = EmployeeUpdate {
                name,
                scores: scores.to_map(),
            };
            if update.is_empty() {
                bail!("Nothing to update. Pass --name or at least one criterion score.");
            }
            let employee = store.update_employee(id, update)?;
            println!("Updated {} (#{})", employee.name, employee.id);
        }
        Commands::Remove { id } => {
            let name = store.get(id).map(|e| e.name.clone());
            if store.remove_employee(id)? {
                println!("Removed {} (#{})", name.unwrap_or_default(), id);
            } else {
                eprintln!("No employee with id {}; nothing removed.", id);
            }
        }
        Commands::Weights { command } => match command.unwrap_or(WeightsCommand::Show) {
            WeightsCommand::Show => {
                println!("{}", output::format_weights(store.weights(), use_colors));
            }
            WeightsCommand::Set(args) => {
                let given = args.to_map();
                let mut weights = *store.weights();
                for criterion in Criterion::ALL {
                    if let Some(weight) = given[criterion] {
                        weights.set(criterion, weight);
                    }
                }
                store.set_weights(weights)?;
                println!("{}", output::format_weights(store.weights(), use_colors));
                if weights.total() == 0.0 {
                    eprintln!(
                        "Note: {}",
                        output::format_warning(scoring::RankingWarning::ZeroTotalWeight)
                    );
                }
            }
        },
        Commands::Reset { yes } => {
            if !yes {
                bail!("Reset deletes every employee and restores default weights. Re-run with --yes to confirm.");
            }
            store.reset_all()?;
            println!("All employees removed and weights reset to 1.");
        }
        Commands::Stats => {
            let summary = scoring::summarize(store.employees());
            println!("{}", output::format_summary(&summary, use_colors));
        }
        Commands::Insight => run_insight(store, config).await?,
    }

    Ok(())
}

async fn run_insight(store: &ScoreStore, config: &Config) -> Result<()> {
    let snapshot = store.snapshot();
    let ranking = scoring::compute(&snapshot.employees, &snapshot.weights);

    let Some(request) =
        InsightRequest::from_ranking(&ranking, &config.insight.language, snapshot.revision)
    else {
        println!("No employees found.");
        return Ok(());
    };

    let client = InsightClient::from_config(&config.insight)?;
    let mut slot = InsightSlot::default();
    slot.begin(request.revision);

    let requested_revision = request.revision;
    let result = tokio::spawn(async move { client.request(&request).await })
        .await
        .map_err(|e| anyhow!("Insight task failed: {}", e))?;

    let insight = result?;
    slot.complete(requested_revision, store.revision(), Ok(insight));
    match slot.text_for(store.revision()) {
        Some(text) => println!("{}", text),
        None => eprintln!("Ranking changed while waiting for the insight service; response discarded."),
    }
    Ok(())
}
