//! Storecard CLI - store equipment and support history records

mod commands;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use storecard::config::{self, StorecardConfig};
use storecard::Database;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "storecard")]
#[command(version)]
#[command(about = "Store equipment records, support history and printable record sheets")]
#[command(long_about = r#"
Storecard keeps a SQLite database of retail stores, enabling:
  • Store profiles with location and contact details
  • Screen and hardware inventories per store
  • Support ticket history per store
  • Printable A4 record sheets (PDF)

Example usage:
  storecard init
  storecard store create LOC-001 "Mall Central" --zone Norte
  storecard screen add LOC-001 --brand LG --reference 49UH5F --inches 55 --position "muro caja"
  storecard export LOC-001
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show record counts and the schema version
    Stats,

    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreCommand,
    },

    /// Manage screens installed at a store
    Screen {
        #[command(subcommand)]
        action: ScreenCommand,
    },

    /// Manage other hardware installed at a store
    Asset {
        #[command(subcommand)]
        action: AssetCommand,
    },

    /// Manage the support history of a store
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },

    /// Write the record sheet of a store as a PDF
    Export {
        /// Store id or code
        store: String,

        /// Output file (defaults to Record_<code>.pdf in the reports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum StoreCommand {
    /// Create a store
    Create {
        /// Unique store code (e.g. LOC-001)
        code: String,
        name: String,
        #[command(flatten)]
        details: StoreDetails,
    },
    /// List all stores by name
    List,
    /// Find stores whose code or name contains the text
    Search { query: String },
    /// Show the full support card of a store
    Show {
        /// Store id or code
        store: String,
    },
    /// Change store fields; pass an empty value to clear an optional field
    Update {
        /// Store id or code
        store: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        details: StoreDetails,
    },
    /// Delete a store with all its screens, assets and history
    Delete {
        /// Store id or code
        store: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Default)]
pub struct StoreDetails {
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub zone: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub contact_name: Option<String>,
    #[arg(long)]
    pub contact_phone: Option<String>,
    #[arg(long)]
    pub contact_name_2: Option<String>,
    #[arg(long)]
    pub contact_phone_2: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum ScreenCommand {
    /// Add a screen to a store
    Add {
        /// Store id or code
        store: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        reference: String,
        #[arg(long)]
        inches: u32,
        #[arg(long)]
        position: String,
        #[command(flatten)]
        details: ScreenDetails,
    },
    /// List the screens of a store
    List {
        /// Store id or code
        store: String,
    },
    /// Change screen fields
    Update {
        id: i64,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        inches: Option<u32>,
        #[arg(long)]
        position: Option<String>,
        #[command(flatten)]
        details: ScreenDetails,
    },
    /// Delete a screen
    Delete { id: i64 },
}

#[derive(Args, Default)]
pub struct ScreenDetails {
    /// Horizontal or Vertical
    #[arg(long)]
    pub orientation: Option<String>,
    /// HDMI1, HDMI2, HDMI3 or DP
    #[arg(long)]
    pub input: Option<String>,
    /// Operativa, Con falla or Retirada
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum AssetCommand {
    /// Add an asset to a store
    Add {
        /// Store id or code
        store: String,
        /// NUC, Router, Splitter, Player, Controladora, Switch or Otro
        #[arg(long = "type", default_value = "Otro")]
        asset_type: String,
        #[command(flatten)]
        details: AssetDetails,
    },
    /// List the assets of a store
    List {
        /// Store id or code
        store: String,
    },
    /// Change asset fields; pass an empty value to clear an optional field
    Update {
        id: i64,
        #[arg(long = "type")]
        asset_type: Option<String>,
        #[command(flatten)]
        details: AssetDetails,
    },
    /// Delete an asset
    Delete { id: i64 },
}

#[derive(Args, Default)]
pub struct AssetDetails {
    #[arg(long)]
    pub brand_model: Option<String>,
    #[arg(long)]
    pub serial: Option<String>,
    #[arg(long)]
    pub lot: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    /// Operativo, Con falla or Retirado
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Record a ticket or maintenance entry
    Add {
        /// Store id or code
        store: String,
        #[arg(long)]
        ticket: String,
        #[arg(long)]
        description: String,
        /// Issue date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        details: HistoryDetails,
    },
    /// List the history of a store, most recent issue first
    List {
        /// Store id or code
        store: String,
    },
    /// Change history fields; pass an empty value to clear an optional field
    Update {
        id: i64,
        #[arg(long)]
        ticket: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Issue date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        details: HistoryDetails,
    },
    /// Delete a history entry
    Delete { id: i64 },
}

#[derive(Args, Default)]
pub struct HistoryDetails {
    /// Resolution date, YYYY-MM-DD
    #[arg(long)]
    pub resolution_date: Option<String>,
    #[arg(long)]
    pub resolution: Option<String>,
    /// Abierto, En proceso, Resuelto or Cerrado
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub technician: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print `data` as pretty JSON on stdout
pub fn emit_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Everything a command needs
pub struct Context {
    pub db: Database,
    pub config: StorecardConfig,
    pub output: OutputMode,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = run(cli) {
        storecard::ui::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let output = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(&config_path))?;
    let is_init = matches!(cli.command, Commands::Init { .. });
    if loaded.is_none() && cli.config.is_some() && !is_init {
        anyhow::bail!("config file not found: {}", config_path.display());
    }
    let config = loaded.unwrap_or_default();
    let db_path = config.database_path(cli.database.as_deref());

    let open = || -> anyhow::Result<Context> {
        tracing::debug!("Opening database {}", db_path.display());
        Ok(Context {
            db: Database::open(&db_path)?,
            config,
            output,
        })
    };

    match cli.command {
        Commands::Init { force } => commands::run_init(output, &config_path, &db_path, force),
        Commands::Stats => commands::run_stats(&open()?),
        Commands::Store { action } => commands::run_store(&open()?, action),
        Commands::Screen { action } => commands::run_screen(&open()?, action),
        Commands::Asset { action } => commands::run_asset(&open()?, action),
        Commands::History { action } => commands::run_history(&open()?, action),
        Commands::Export { store, output } => commands::run_export(&open()?, &store, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "storecard", "store", "show", "LOC-001", "--json", "--database", "x.db",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.database, Some(PathBuf::from("x.db")));
        assert!(matches!(
            cli.command,
            Commands::Store { action: StoreCommand::Show { ref store } } if store == "LOC-001"
        ));
    }

    #[test]
    fn test_asset_type_defaults_to_other() {
        let cli = Cli::try_parse_from(["storecard", "asset", "add", "LOC-001"]).unwrap();
        match cli.command {
            Commands::Asset { action: AssetCommand::Add { asset_type, .. } } => {
                assert_eq!(asset_type, "Otro")
            }
            _ => panic!("expected asset add"),
        }
    }

    #[test]
    fn test_screen_add_requires_inches() {
        let result = Cli::try_parse_from([
            "storecard", "screen", "add", "LOC-001", "--brand", "LG", "--reference", "X",
            "--position", "caja",
        ]);
        assert!(result.is_err());
    }
}
