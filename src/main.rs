//! Folio CLI - browse portfolio projects and replay page interactions.

use std::io::Read;
use std::path::Path;
use std::process;

use clap::Parser;
use folio::cli::{Cli, Commands, ConfigCommands, build_query, build_update};
use folio::commands::{self, Output, RenderRequest, ReplayHost};
use folio::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use folio::page::PageOptions;
use folio::store::ProjectStore;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g., `folio=debug`).
const LOG_ENV: &str = "FOLIO_LOG";

fn main() {
    init_logging();

    let cli = Cli::parse();

    let mut overrides = ConfigOverrides::new();
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if let Some(ref path) = cli.data {
        overrides = overrides.with_data_file(path);
    }
    if let Some(ref dir) = cli.config_dir {
        overrides = overrides.with_config_dir(dir);
    }

    // Config errors are reported before the output format is known.
    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };
    let human = config.output_format() == OutputFormat::Human;

    if let Err(e) = run_command(cli.command, &config, &overrides, human) {
        exit_with_error(&e, human);
    }
}

/// Logs go to stderr so JSON on stdout stays parseable.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_with_error(e: &folio::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

fn load_store(config: &ResolvedConfig) -> Result<ProjectStore, folio::Error> {
    match config.data_file() {
        Some(path) => ProjectStore::load(path),
        None => ProjectStore::bundled(),
    }
}

/// `--save` needs a file to write to; the bundled dataset is read-only.
fn save_target<'a>(config: &'a ResolvedConfig, save: bool) -> Result<Option<&'a Path>, folio::Error> {
    if !save {
        return Ok(None);
    }
    config.data_file().map(Some).ok_or_else(|| {
        folio::Error::InvalidInput("--save needs a dataset file (--data or FOLIO_DATA)".to_string())
    })
}

fn read_script(path: &Path) -> Result<String, folio::Error> {
    if path == Path::new("-") {
        let mut script = String::new();
        std::io::stdin().read_to_string(&mut script)?;
        Ok(script)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn run_command(
    command: Option<Commands>,
    config: &ResolvedConfig,
    overrides: &ConfigOverrides,
    human: bool,
) -> Result<(), folio::Error> {
    match command {
        None => {
            let store = load_store(config)?;
            let result = commands::overview(&store, config.data_file());
            output(&result, human);
        }

        Some(Commands::List {
            category,
            status,
            priority,
            search,
            sort,
            favorites,
        }) => {
            let store = load_store(config)?;
            let query = build_query(
                category.as_deref(),
                status.as_deref(),
                priority.as_deref(),
                search,
                sort,
                favorites,
            )
            .map_err(folio::Error::InvalidInput)?;
            let result = commands::list(&store, &query);
            output(&result, human);
        }

        Some(Commands::Show { id }) => {
            let store = load_store(config)?;
            let result = commands::show(&store, &id)?;
            output(&result, human);
        }

        Some(Commands::Stats) => {
            let store = load_store(config)?;
            output(&commands::stats(&store), human);
        }

        Some(Commands::Options) => {
            let store = load_store(config)?;
            output(&commands::options(&store), human);
        }

        Some(Commands::Favorite { id, save }) => {
            let mut store = load_store(config)?;
            let target = save_target(config, save)?;
            let result = commands::favorite(&mut store, &id, target)?;
            output(&result, human);
        }

        Some(Commands::Update {
            id,
            title,
            description,
            status,
            priority,
            progress,
            tags,
            save,
        }) => {
            let mut store = load_store(config)?;
            let target = save_target(config, save)?;
            let patch = build_update(title, description, status, priority, progress, tags);
            let result = commands::update(&mut store, &id, patch, target)?;
            output(&result, human);
        }

        Some(Commands::Render {
            category,
            status,
            search,
            sort,
            expand,
            select_mode,
        }) => {
            let store = load_store(config)?;
            let request = RenderRequest {
                category,
                status,
                search,
                sort,
                expand,
                selection_mode: select_mode,
            };
            let result = commands::render(store, PageOptions::from_config(config), &request)?;
            output(&result, human);
        }

        Some(Commands::Replay {
            script,
            confirm,
            share,
            viewport_height,
            html,
        }) => {
            let store = load_store(config)?;
            let script = read_script(&script)?;
            let host = ReplayHost {
                confirm: confirm.accepted(),
                share,
                viewport_height,
            };
            let result = commands::replay(store, PageOptions::from_config(config), &script, &host, html)?;
            output(&result, human);
        }

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => {
                output(&commands::config_show(config), human);
            }
            ConfigCommands::Get { key } => {
                let result = commands::config_get(overrides, &key)?;
                output(&result, human);
            }
            ConfigCommands::Set { key, value } => {
                let result = commands::config_set(overrides, &key, &value)?;
                output(&result, human);
            }
        },
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
