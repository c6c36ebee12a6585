use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{MovieRecord, MovieTable};
use engine::{EngineError, Model, ModelBuilder, ModelConfig, Recommendation};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Number of rows shown by `search`
const SEARCH_RESULTS: usize = 20;

/// PlotRecs - Movie recommendations from plot similarity
#[derive(Parser)]
#[command(name = "plot-recs")]
#[command(about = "Recommend movies with similar plots (TF-IDF over synopses)", long_about = None)]
struct Cli {
    /// Path to the raw movie dataset (CSV with id, title, overview)
    #[arg(long, env = "PLOT_RECS_DATASET", default_value = engine::config::DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Directory holding the cached model artifacts
    #[arg(long, env = "PLOT_RECS_MODEL_DIR", default_value = engine::config::DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movies with plots similar to a given title
    Recommend {
        /// Exact movie title
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = engine::DEFAULT_RECOMMENDATIONS)]
        limit: usize,

        /// Show the similarity score for each recommendation
        #[arg(long)]
        explain: bool,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// List all selectable titles in table order
    List {
        /// Maximum number of titles to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rebuild the model from the dataset and overwrite the cache
    Rebuild,

    /// Pick titles at a prompt and get recommendations
    Interactive,
}

fn main() -> Result<()> {
    // Logs go to stderr so results on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ModelConfig::new()
        .with_dataset_path(cli.dataset)
        .with_model_dir(cli.model_dir);

    match cli.command {
        Commands::Recommend {
            title,
            limit,
            explain,
            json,
        } => handle_recommend(load_model(&config)?, &title, limit, explain, json)?,
        Commands::Search { title } => {
            handle_search(load_model(&config)?, &title);
        }
        Commands::List { limit } => handle_list(load_model(&config)?, limit),
        Commands::Rebuild => handle_rebuild(&config)?,
        Commands::Interactive => handle_interactive(load_model(&config)?)?,
    }

    Ok(())
}

/// Load or build the process-wide model
fn load_model(config: &ModelConfig) -> Result<&'static Model> {
    let start = Instant::now();
    let model = engine::shared_model(config).with_context(|| {
        format!(
            "Failed to load model (dataset: {}, cache: {})",
            config.dataset_path().display(),
            config.model_dir().display()
        )
    })?;
    info!("Model ready: {} movies in {:?}", model.len(), start.elapsed());
    Ok(model)
}

/// Handle the 'recommend' command
fn handle_recommend(
    model: &Model,
    title: &str,
    limit: usize,
    explain: bool,
    json: bool,
) -> Result<()> {
    let recommendations = engine::recommend_scored(title, model.table(), model.matrix(), limit)
        .map_err(|e| match e {
            EngineError::UnknownTitle { title } => anyhow!("Movie {:?} not found", title),
            other => anyhow::Error::new(other),
        })?;

    if json {
        let out = serde_json::to_string_pretty(&recommendations)
            .context("Failed to serialize recommendations")?;
        println!("{out}");
    } else {
        print_recommendations(title, &recommendations, explain);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(model: &Model, title: &str) -> Vec<MovieRecord> {
    let matches: Vec<MovieRecord> = model
        .table()
        .search(title)
        .into_iter()
        .take(SEARCH_RESULTS)
        .map(|(_, record)| record.clone())
        .collect();

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("No matching titles.");
    }
    for (i, record) in matches.iter().enumerate() {
        println!(
            "{}. {} (id {})",
            (i + 1).to_string().green(),
            record.title,
            record.id
        );
    }
    matches
}

/// Handle the 'list' command
fn handle_list(model: &Model, limit: Option<usize>) {
    let limit = limit.unwrap_or(usize::MAX);
    for title in model.table().titles().take(limit) {
        println!("{title}");
    }
}

/// Handle the 'rebuild' command
fn handle_rebuild(config: &ModelConfig) -> Result<()> {
    let start = Instant::now();
    let model = ModelBuilder::new(config.clone())
        .rebuild()
        .with_context(|| format!("Failed to rebuild from {}", config.dataset_path().display()))?;

    info!(
        "Rebuilt model for {} movies in {:?}, cached in {}",
        model.len(),
        start.elapsed(),
        config.model_dir().display()
    );
    Ok(())
}

/// Handle the 'interactive' command
fn handle_interactive(model: &Model) -> Result<()> {
    println!(
        "{}",
        "Type a movie title (or a number from the last search). Empty line or 'quit' exits."
            .bold()
            .blue()
    );

    let stdin = io::stdin();
    let mut listing: Vec<MovieRecord> = Vec::new();
    let mut line = String::new();

    loop {
        print!("{} ", ">".cyan());
        io::stdout().flush().context("Failed to flush prompt")?;

        line.clear();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let title = resolve_selection(input, model.table(), &listing);

        match engine::recommend_scored(
            &title,
            model.table(),
            model.matrix(),
            engine::DEFAULT_RECOMMENDATIONS,
        ) {
            Ok(recommendations) => print_recommendations(&title, &recommendations, false),
            Err(EngineError::UnknownTitle { .. }) => {
                println!("{}", format!("Movie {:?} not found.", title).red());
                listing = handle_search(model, &title);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Turn prompt input into a title.
///
/// An exact title wins; otherwise a number picks from the last search listing.
fn resolve_selection(input: &str, table: &MovieTable, listing: &[MovieRecord]) -> String {
    if table.index_of_title(input).is_some() {
        return input.to_string();
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=listing.len()).contains(&n) => listing[n - 1].title.clone(),
        _ => input.to_string(),
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[Recommendation], explain: bool) {
    println!("{}", format!("Movies like '{}':", title).bold().blue());
    if recommendations.is_empty() {
        println!("No recommendations found.");
        return;
    }
    for (i, rec) in recommendations.iter().enumerate() {
        if explain {
            println!(
                "{}. {} - Similarity: {:.4} (id {})",
                (i + 1).to_string().green(),
                rec.title,
                rec.score,
                rec.movie_id
            );
        } else {
            println!("{}. {}", (i + 1).to_string().green(), rec.title);
        }
    }
}
