//! `hc` is a small command-line tool to inspect and initialize a config file
//! that may live in the home directory or next to the program.
use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use comfy_table::Table;
use home_config::{format, ConfigLocator, Location};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(subcommand_required = true, arg_required_else_help = true)]
#[clap(
    after_help = "PRECEDENCE:\n  A file in the home directory always wins over one in the program directory.\n\nExamples:\n  hc --name myapp.cfg paths                   # Show both candidate paths\n  hc --name myapp.cfg init --at program       # Create an empty file next to the program\n  hc --name myapp.cfg init --at home --from defaults.cfg --force\n  hc --name myapp.cfg get main.color          # Read one value from the active file"
)]
struct Cli {
    /// Bare file name of the config file
    #[clap(long, global = true)]
    name: Option<String>,
    /// Directory to use instead of the program's own directory
    #[clap(long, global = true)]
    program_dir: Option<PathBuf>,
    /// Directory to use instead of the user's home directory
    #[clap(long, global = true)]
    home_dir: Option<PathBuf>,
    /// Log resolution steps to stderr
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show both candidate paths and which one is active
    Paths,
    /// Print the path of the active config file
    Active,
    /// Create the config file in the home or program directory
    Init {
        #[clap(long, default_value = "home")]
        at: Location,
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
        /// Copy the initial content from this file
        #[clap(long, conflicts_with = "content")]
        from: Option<PathBuf>,
        /// Initial content
        #[clap(long)]
        content: Option<String>,
    },
    /// Print one value from the active config file
    Get {
        /// Dotted key, e.g. `section.key`
        key: String,
    },
    /// Print every value in the active config file
    Show {
        #[clap(long)]
        json: bool,
    },
    /// Open the config file in your editor
    Edit {
        /// Edit this location instead of the active file
        #[clap(long)]
        at: Option<Location>,
    },
    /// Generate shell completion scripts
    GenerateCompletions { shell: Shell },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn build_locator(cli: &Cli) -> Result<ConfigLocator> {
    let name = cli
        .name
        .clone()
        .context("A config file name is required, pass --name <FILE>")?;
    ConfigLocator::with_dirs(name, cli.program_dir.clone(), cli.home_dir.clone())
        .context("Failed to set up config locator")
}

fn paths_table(locator: &ConfigLocator) -> Table {
    let active = locator.active_location().ok().map(|(location, _)| location);

    let mut table = Table::new();
    table.set_header(vec!["Location", "Path", "Exists", "Active"]);
    for candidate in locator.candidates() {
        table.add_row(vec![
            candidate.location.to_string(),
            candidate.path.display().to_string(),
            if candidate.exists { "yes" } else { "no" }.to_string(),
            if active == Some(candidate.location) { "*" } else { "" }.to_string(),
        ]);
    }
    table
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // The completions command is a special case that doesn't need a locator.
    if let Commands::GenerateCompletions { shell } = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let locator = build_locator(&cli)?;

    match cli.command {
        Commands::Paths => {
            println!("{}", paths_table(&locator));
        }
        Commands::Active => {
            let path = locator.active_config_path()?;
            println!("{}", path.display());
        }
        Commands::Init {
            at,
            force,
            from,
            content,
        } => {
            let content = match (from, content) {
                (Some(source), _) => fs::read_to_string(&source)
                    .with_context(|| format!("Failed to read {}", source.display()))?,
                (None, Some(text)) => text,
                (None, None) => String::new(),
            };
            debug!(%at, force, bytes = content.len(), "init");
            locator.create_in(at, &content, force)?;
            println!("Created {}", locator.location_of(at).display());
        }
        Commands::Get { key } => {
            let path = locator.active_config_path()?;
            let value = format::get_string(&path, &key)?;
            println!("{}", value);
        }
        Commands::Show { json } => {
            let path = locator.active_config_path()?;
            let config = format::load(&path)?;
            let values = format::flatten(&config)
                .with_context(|| format!("Failed to read values from {}", path.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else if values.is_empty() {
                println!("No values in {}.", path.display());
            } else {
                let mut table = Table::new();
                table.set_header(vec!["Key", "Value"]);
                for (key, value) in &values {
                    table.add_row(vec![key, value]);
                }
                println!("{}", table);
            }
        }
        Commands::Edit { at } => {
            let path = match at {
                Some(location) => locator.location_of(location),
                None => locator.active_config_path()?,
            };
            if !path.is_file() {
                bail!(
                    "{} does not exist, create it first with `hc init --at {}`",
                    path.display(),
                    at.unwrap_or(Location::Home)
                );
            }
            edit::edit_file(&path)
                .with_context(|| format!("Failed to edit {}", path.display()))?;
        }
        Commands::GenerateCompletions { .. } => unreachable!(),
    }

    Ok(())
}
