use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use booklistings_core::book::SlotId;
use booklistings_core::config::{config_path, load_config, write_default_config, AppConfig};
use booklistings_core::error::{ErrorKind, SearchRejected};
use booklistings_core::list::{Applied, BookList, ListState};
use booklistings_core::pipeline::SearchPipeline;
use booklistings_core::thumbnail::ThumbnailFetcher;

mod view;

use view::{HostProbe, PrintNavigator, TerminalView};

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "booklistings")]
#[command(about = "Search a book catalog from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog and list matching books
    Search {
        /// Search term (multiple words are joined)
        #[arg(required = true)]
        term: Vec<String>,

        /// Don't download cover images
        #[arg(long)]
        no_covers: bool,
    },

    /// Interactive session: each line starts a new search, `open <n>` shows a book
    Browse {
        /// Don't download cover images
        #[arg(long)]
        no_covers: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize default config file
    Init,
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Key (dot-separated path)
        key: String,
        /// Value
        value: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Search { term, no_covers } => run_search(term, !*no_covers, cli.json).await,
        Commands::Browse { no_covers } => run_browse(!*no_covers).await,
        Commands::Config { action } => run_config(action, cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn open_list(
    config: &AppConfig,
    live: bool,
) -> Result<(BookList<TerminalView>, HostProbe), Box<dyn std::error::Error + Send + Sync>> {
    let pipeline = SearchPipeline::new(&config.search)?;
    let fetcher = ThumbnailFetcher::new(&config.thumbnails)?;
    let probe = HostProbe::for_url(pipeline.base_url());
    Ok((BookList::new(TerminalView::new(live), pipeline, fetcher), probe))
}

/// Every result row is visible in a terminal, so bind them all.
fn bind_all_rows(list: &mut BookList<TerminalView>) {
    for index in 0..list.books().len() {
        list.bind_row(SlotId(index), index);
    }
}

async fn run_search(terms: &[String], covers: bool, json: bool) -> CliResult {
    let config = load_config().with_env_overrides();
    let (mut list, probe) = open_list(&config, false)?;

    list.search(&terms.join(" "), &probe.is_reachable().await)?;
    list.settle().await;

    let state = list.state();
    if let ListState::Failed(_) = state {
        return Err(state.empty_message().unwrap_or("Search failed").into());
    }

    if covers {
        bind_all_rows(&mut list);
        list.settle().await;
    }
    list.view().render(state, covers, json)?;
    Ok(())
}

async fn run_browse(covers: bool) -> CliResult {
    let config = load_config().with_env_overrides();
    let (mut list, probe) = open_list(&config, true)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // The session opens on a default search, or on the no-connection notice.
    let initial = config.search.initial_term.trim();
    if !initial.is_empty() {
        match list.search(initial, &probe.is_reachable().await) {
            Ok(_) => {
                list.settle().await;
                if covers && list.state() == ListState::Loaded {
                    bind_all_rows(&mut list);
                }
            }
            Err(SearchRejected::Offline) => {
                println!("{}", ListState::Failed(ErrorKind::Network).empty_message().unwrap_or_default());
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    println!("Type a search term, `open <n>` to view a book, `quit` to exit.");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line == "quit" || line == "exit" {
                    break;
                }
                if let Some(n) = line.strip_prefix("open ") {
                    let n = n.trim();
                    match n.parse::<usize>() {
                        Ok(n) if n >= 1 && list.open_detail(n - 1, &PrintNavigator) => {}
                        _ => eprintln!("No book #{n}"),
                    }
                    continue;
                }
                if let Err(e) = list.search(line, &probe.is_reachable().await) {
                    eprintln!("{e}");
                }
            }
            applied = list.process_next(), if !list.is_idle() => {
                if let Some(Applied::Search { applied: true, .. }) = applied {
                    if covers {
                        bind_all_rows(&mut list);
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_config(action: &ConfigAction, json: bool) -> CliResult {
    match action {
        ConfigAction::Init => {
            let path = config_path().ok_or("Could not determine config directory")?;
            write_default_config(&path)?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            let cfg = load_config().with_env_overrides();
            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else {
                println!("{}", cfg.to_toml()?);
            }
        }
        ConfigAction::Set { key, value } => {
            let path = config_path().ok_or("Could not determine config directory")?;
            let mut cfg = if path.exists() {
                let s = std::fs::read_to_string(&path)?;
                AppConfig::from_toml(&s)?
            } else {
                AppConfig::default()
            };

            set_config_key(&mut cfg, key, value)?;

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, cfg.to_toml()?)?;
            if !json {
                println!("Updated {}", key);
            }
        }
    }
    Ok(())
}

fn set_config_key(cfg: &mut AppConfig, key: &str, value: &str) -> CliResult {
    let parts: Vec<&str> = key.splitn(2, '.').collect();
    match parts.as_slice() {
        ["search", sub] => match *sub {
            "base_url" => cfg.search.base_url = value.to_string(),
            "max_results" => cfg.search.max_results = parse_number(key, value)?,
            "timeout_secs" => cfg.search.timeout_secs = parse_number(key, value)?,
            "user_agent" => cfg.search.user_agent = value.to_string(),
            "initial_term" => cfg.search.initial_term = value.to_string(),
            _ => return Err(format!("Unknown key: {}", key).into()),
        },
        ["thumbnails", sub] => match *sub {
            "timeout_secs" => cfg.thumbnails.timeout_secs = parse_number(key, value)?,
            "max_dimension" => cfg.thumbnails.max_dimension = parse_number(key, value)?,
            _ => return Err(format!("Unknown key: {}", key).into()),
        },
        _ => return Err(format!("Unknown key: {}", key).into()),
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid number for {}: {}", key, value))
}
