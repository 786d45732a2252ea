//! repokit CLI
//!
//! Ad-hoc lookups and writes against an existing SQLite database through a
//! repository resolved by name (`UserRepository` -> table `user`).

use clap::{Args, Parser, Subcommand};
use log::info;
use repokit_core::{init_logging, LogConfig};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "repokit", version)]
#[command(about = "Convention-driven repository access to a SQLite database", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database file; its schema is used as-is
    #[arg(long, global = true, default_value = "app.db")]
    pub db: PathBuf,

    /// Model folder the repository's model lives under
    #[arg(long, global = true)]
    pub folder: Option<String>,

    /// Explicit table, overriding the naming convention
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Primary key column
    #[arg(long, global = true, default_value = "id")]
    pub primary_key: String,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find one record by primary key
    Find(commands::FindArgs),
    /// Run a finder given by name, e.g. findByEmail or find_all_by_status
    Call(commands::CallArgs),
    /// List records, optionally one page at a time
    All(commands::AllArgs),
    /// Create a record from FIELD=VALUE pairs
    Create(commands::CreateArgs),
    /// Update a record from FIELD=VALUE pairs
    Update(commands::UpdateArgs),
    /// Delete a record by primary key
    Delete(commands::DeleteArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.global.log_dir.as_ref() {
        let config = match cli.global.log_level.as_deref() {
            Some(level) => LogConfig::new(level, log_dir),
            None => LogConfig::with_default_level(log_dir),
        };
        if let Err(e) = init_logging(&config) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        info!(
            "event=cli_start module=cli status=ok core_version={}",
            repokit_core::core_version()
        );
    }

    let result = match cli.command {
        Commands::Find(args) => commands::execute_find(&cli.global, args),
        Commands::Call(args) => commands::execute_call(&cli.global, args),
        Commands::All(args) => commands::execute_all(&cli.global, args),
        Commands::Create(args) => commands::execute_create(&cli.global, args),
        Commands::Update(args) => commands::execute_update(&cli.global, args),
        Commands::Delete(args) => commands::execute_delete(&cli.global, args),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
