use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pokegallery_core::table::{CatalogTable, Column, Direction};
use pokegallery_core::{
    ApplyOutcome, Config, DetailKey, PokeApi, QueryController, RecordSource, SearchStrategy,
    config_file,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod output;

use output::ColorMode;

/// Browse, search and inspect the Pokémon catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "pokegallery", version, about, long_about = None)]
struct Cli {
    /// Catalog API root (default: https://pokeapi.co/api/v2)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// How search text is resolved: "direct" or "substring"
    #[arg(long, global = true)]
    strategy: Option<SearchStrategy>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of the catalog
    Browse {
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Search the catalog by name
    Search {
        /// Name or name fragment
        text: String,
    },

    /// Show the full details of one Pokémon
    Show {
        /// Name or Pokédex number
        name_or_id: String,
    },

    /// Sortable table over the first catalog entries
    Table {
        /// Only rows whose name contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Sort column: id, name, height or weight
        #[arg(long)]
        sort: Option<Column>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Print the resolved configuration as TOML
    Config {
        /// Also write it to the platform config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli);
    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
    let mut stdout = std::io::stdout();

    if let Command::Config { save } = cli.command {
        print_config(&config, &mut stdout)?;
        if save {
            let path = config_file::save_config(&config.to_file())?;
            eprintln!("Saved config to {}", path.display());
        }
        return Ok(());
    }

    let source: Arc<dyn RecordSource> = Arc::new(
        PokeApi::from_config(&config)
            .with_context(|| format!("cannot use base URL {}", config.base_url))?,
    );
    tracing::debug!(base_url = %config.base_url, strategy = %config.search_strategy, "resolved config");

    match cli.command {
        Command::Browse { page } => browse(source, &config, page, &mut stdout, color).await,
        Command::Search { text } => search(source, &config, &text, &mut stdout, color).await,
        Command::Show { name_or_id } => show(source, &name_or_id, &mut stdout, color).await,
        Command::Table {
            filter,
            sort,
            desc,
            page,
        } => {
            let sort = sort.map(|c| {
                let direction = if desc {
                    Direction::Descending
                } else {
                    Direction::Ascending
                };
                (c, direction)
            });
            table(source, &config, filter, sort, page, &mut stdout, color).await
        }
        Command::Config { .. } => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

/// CLI flags > env vars > config files > defaults.
fn resolve_config(cli: &Cli) -> Config {
    let mut config = Config::from_file(&config_file::load_config()).with_env();
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    if let Some(strategy) = cli.strategy {
        config.search_strategy = strategy;
    }
    config
}

fn print_config(config: &Config, w: &mut dyn Write) -> anyhow::Result<()> {
    write!(w, "{}", config.to_file().to_toml_string()?)?;
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Print the controller's pending notice and turn failures into an error exit.
fn finish(
    controller: &mut QueryController,
    outcome: ApplyOutcome,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    if let Some(notice) = controller.take_notice() {
        output::print_notice(&mut std::io::stderr(), &notice, color)?;
        if outcome == ApplyOutcome::Failed {
            anyhow::bail!("{}", notice.message);
        }
    }
    output::print_listing(w, &controller.view(), color)?;
    Ok(())
}

async fn browse(
    source: Arc<dyn RecordSource>,
    config: &Config,
    page: usize,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut controller = QueryController::new(source, config);
    let ticket = controller
        .on_page_change(page)
        .unwrap_or_else(|| controller.refresh());

    let pb = spinner("Loading Pokémon...");
    let outcome = controller.run(ticket).await;
    pb.finish_and_clear();

    finish(&mut controller, outcome, w, color)
}

async fn search(
    source: Arc<dyn RecordSource>,
    config: &Config,
    text: &str,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut controller = QueryController::new(source, config);
    let ticket = controller
        .commit_search_text(text)
        .unwrap_or_else(|| controller.refresh());

    let pb = spinner(&format!("Searching for \"{}\"...", text.trim()));
    let outcome = controller.run(ticket).await;
    pb.finish_and_clear();

    finish(&mut controller, outcome, w, color)
}

async fn show(
    source: Arc<dyn RecordSource>,
    name_or_id: &str,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let key = DetailKey::parse(name_or_id);
    let pb = spinner(&format!("Fetching {}...", key));
    let result = pokegallery_core::load_detail(source.as_ref(), &key).await;
    pb.finish_and_clear();

    match result {
        Ok(view) => {
            output::print_detail(w, &view, color)?;
            Ok(())
        }
        Err(e) if e.is_not_found() => anyhow::bail!("No Pokémon named \"{}\"", name_or_id.trim()),
        Err(e) => Err(e).context("Failed to fetch Pokémon details"),
    }
}

async fn table(
    source: Arc<dyn RecordSource>,
    config: &Config,
    filter: Option<String>,
    sort: Option<(Column, Direction)>,
    page: usize,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let pb = spinner("Loading table...");
    let loaded = CatalogTable::load(source, config.table_fetch_limit, config.table_page_size).await;
    pb.finish_and_clear();

    let mut table = loaded.context("Failed to load Pokémon list")?;
    if let Some(filter) = filter {
        table.set_filter(&filter);
    }
    if let Some((column, direction)) = sort {
        table.sort_by(column, direction);
    }
    table.set_page(page);
    output::print_table(w, &table, color)?;
    Ok(())
}
